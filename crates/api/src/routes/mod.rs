//! API route definitions.

use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse, response::Response};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::auth::auth_middleware};
use obralis_db::{OrganizationRepository, entities::sea_orm_active_enums::UserRole};
use obralis_shared::types::Currency;

pub mod accounts;
pub mod auth;
pub mod bills;
pub mod checks;
pub mod health;
pub mod journal;
pub mod organizations;
pub mod reports;
pub mod stock;
pub mod treasury;
pub mod wiki;

/// Distinguishes an absent request field from an explicit `null`.
pub(crate) mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Parses a request currency code, mapping unknown codes to a ready
/// 422 response. Every handler that persists a currency goes through
/// this so no unsupported code reaches the database.
pub(crate) fn require_currency(raw: &str) -> Result<Currency, Response> {
    raw.parse::<Currency>().map_err(|_| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "invalid_currency",
                "message": format!("Unsupported currency: {raw}")
            })),
        )
            .into_response()
    })
}

/// Standard 500 response.
pub(crate) fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error", "message": "An error occurred" })),
    )
        .into_response()
}

/// Standard 403 response.
pub(crate) fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": "Insufficient permissions for this organization"
        })),
    )
        .into_response()
}

/// Checks that the user is a member of the organization. Returns a
/// ready response on failure.
pub(crate) async fn ensure_member(
    state: &AppState,
    org_id: Uuid,
    user_id: Uuid,
) -> Result<(), Response> {
    let org_repo = OrganizationRepository::new((*state.db).clone());
    match org_repo.is_member(org_id, user_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(forbidden()),
        Err(e) => {
            error!(error = %e, "Database error checking membership");
            Err(internal_error())
        }
    }
}

/// Checks that the user holds at least the given role in the
/// organization.
pub(crate) async fn ensure_role(
    state: &AppState,
    org_id: Uuid,
    user_id: Uuid,
    required: UserRole,
) -> Result<(), Response> {
    let org_repo = OrganizationRepository::new((*state.db).clone());
    match org_repo.has_role(org_id, user_id, required).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(forbidden()),
        Err(e) => {
            error!(error = %e, "Database error checking role");
            Err(internal_error())
        }
    }
}

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(organizations::routes())
        .merge(accounts::routes())
        .merge(journal::routes())
        .merge(reports::routes())
        .merge(treasury::routes())
        .merge(bills::routes())
        .merge(checks::routes())
        .merge(stock::routes())
        .merge(wiki::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_currency_known_codes() {
        assert_eq!(require_currency("EUR").unwrap(), Currency::Eur);
        assert_eq!(require_currency("usd").unwrap(), Currency::Usd);
        assert_eq!(require_currency("Ars").unwrap(), Currency::Ars);
    }

    #[test]
    fn test_require_currency_rejects_unknown_code() {
        let response = require_currency("XYZ").unwrap_err();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_require_currency_rejects_empty() {
        assert!(require_currency("").is_err());
    }
}
