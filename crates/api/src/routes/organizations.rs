//! Organization management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use obralis_db::{
    OrganizationRepository, SessionRepository, UserRepository,
    repositories::OrganizationUpdate,
    entities::sea_orm_active_enums::UserRole,
};
use obralis_shared::auth::{AddMemberRequest, CreateOrganizationRequest, UpdateOrganizationRequest};
use obralis_shared::types::Currency;

/// Creates the organizations router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations", post(create_organization))
        .route("/organizations/{org_id}", get(get_organization))
        .route("/organizations/{org_id}", patch(update_organization))
        .route("/organizations/{org_id}/users", get(list_users))
        .route("/organizations/{org_id}/users", post(add_user))
        .route("/organizations/{org_id}/users/{user_id}", delete(remove_user))
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error", "message": "An error occurred" })),
    )
        .into_response()
}

fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": "Insufficient permissions for this organization"
        })),
    )
        .into_response()
}

fn org_json(org: &obralis_db::entities::organizations::Model) -> serde_json::Value {
    json!({
        "id": org.id,
        "name": org.name,
        "slug": org.slug,
        "base_currency": org.base_currency,
        "accounting_enabled": org.accounting_enabled,
        "receivable_account_id": org.receivable_account_id,
        "payable_account_id": org.payable_account_id,
        "is_active": org.is_active,
        "created_at": org.created_at
    })
}

/// POST /organizations - Create a new organization.
async fn create_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateOrganizationRequest>,
) -> impl IntoResponse {
    let org_repo = OrganizationRepository::new((*state.db).clone());

    if Currency::from_str(&payload.base_currency).is_err() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "invalid_currency",
                "message": format!("Unsupported currency: {}", payload.base_currency)
            })),
        )
            .into_response();
    }

    match org_repo.slug_exists(&payload.slug).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "slug_exists",
                    "message": "An organization with this slug already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking slug");
            return internal_error();
        }
    }

    let org = match org_repo
        .create_with_owner(
            &payload.name,
            &payload.slug,
            &payload.base_currency,
            auth.user_id(),
        )
        .await
    {
        Ok(o) => o,
        Err(e) => {
            error!(error = %e, "Failed to create organization");
            return internal_error();
        }
    };

    info!(
        org_id = %org.id,
        slug = %org.slug,
        owner_id = %auth.user_id(),
        "Organization created"
    );

    (StatusCode::CREATED, Json(org_json(&org))).into_response()
}

/// GET /organizations/{org_id} - Get organization details.
async fn get_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> impl IntoResponse {
    let org_repo = OrganizationRepository::new((*state.db).clone());

    match org_repo.is_member(org_id, auth.user_id()).await {
        Ok(true) => {}
        Ok(false) => return forbidden(),
        Err(e) => {
            error!(error = %e, "Database error checking membership");
            return internal_error();
        }
    }

    match org_repo.find_by_id(org_id).await {
        Ok(Some(org)) => (StatusCode::OK, Json(org_json(&org))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not_found", "message": "Organization not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error fetching organization");
            internal_error()
        }
    }
}

/// PATCH /organizations/{org_id} - Update organization settings.
async fn update_organization(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> impl IntoResponse {
    let org_repo = OrganizationRepository::new((*state.db).clone());

    match org_repo.has_role(org_id, auth.user_id(), UserRole::Admin).await {
        Ok(true) => {}
        Ok(false) => return forbidden(),
        Err(e) => {
            error!(error = %e, "Database error checking role");
            return internal_error();
        }
    }

    if let Some(currency) = &payload.base_currency {
        if Currency::from_str(currency).is_err() {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "invalid_currency",
                    "message": format!("Unsupported currency: {currency}")
                })),
            )
                .into_response();
        }
    }

    let update = OrganizationUpdate {
        name: payload.name,
        base_currency: payload.base_currency,
        accounting_enabled: payload.accounting_enabled,
        receivable_account_id: payload.receivable_account_id,
        payable_account_id: payload.payable_account_id,
    };

    match org_repo.update(org_id, update).await {
        Ok(org) => (StatusCode::OK, Json(org_json(&org))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update organization");
            internal_error()
        }
    }
}

/// GET /organizations/{org_id}/users - List organization members.
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> impl IntoResponse {
    let org_repo = OrganizationRepository::new((*state.db).clone());

    match org_repo.is_member(org_id, auth.user_id()).await {
        Ok(true) => {}
        Ok(false) => return forbidden(),
        Err(e) => {
            error!(error = %e, "Database error checking membership");
            return internal_error();
        }
    }

    match org_repo.get_users(org_id).await {
        Ok(users) => {
            let members: Vec<_> = users
                .into_iter()
                .map(|(user, membership)| {
                    let role: obralis_core::auth::UserRole = membership.role.into();
                    json!({
                        "id": user.id,
                        "email": user.email,
                        "full_name": user.full_name,
                        "role": role.to_string(),
                        "joined_at": membership.created_at
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "users": members }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing members");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/users - Add a member by email.
async fn add_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<AddMemberRequest>,
) -> impl IntoResponse {
    let org_repo = OrganizationRepository::new((*state.db).clone());
    let user_repo = UserRepository::new((*state.db).clone());

    match org_repo.has_role(org_id, auth.user_id(), UserRole::Admin).await {
        Ok(true) => {}
        Ok(false) => return forbidden(),
        Err(e) => {
            error!(error = %e, "Database error checking role");
            return internal_error();
        }
    }

    let Ok(role) = obralis_core::auth::UserRole::from_str(&payload.role) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "invalid_role",
                "message": format!("Unknown role: {}", payload.role)
            })),
        )
            .into_response();
    };
    if role == obralis_core::auth::UserRole::Owner {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "invalid_role",
                "message": "Ownership cannot be granted through membership"
            })),
        )
            .into_response();
    }

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "user_not_found",
                    "message": "No account exists for this email"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error finding user");
            return internal_error();
        }
    };

    match org_repo.is_member(org_id, user.id).await {
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "already_member",
                    "message": "User is already a member of this organization"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking membership");
            return internal_error();
        }
    }

    let membership = match org_repo.add_user(org_id, user.id, role.into()).await {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "Failed to add member");
            return internal_error();
        }
    };

    // Invitation email is best effort; membership stands either way.
    if state.email_service.is_configured() {
        let org_name = org_repo
            .find_by_id(org_id)
            .await
            .ok()
            .flatten()
            .map_or_else(|| "your organization".to_string(), |o| o.name);
        if let Err(e) = state
            .email_service
            .send_member_invitation(&user.email, &org_name)
            .await
        {
            warn!(error = %e, "Failed to send invitation email");
        }
    }

    info!(org_id = %org_id, user_id = %user.id, "Member added");

    (
        StatusCode::CREATED,
        Json(json!({
            "user_id": membership.user_id,
            "organization_id": membership.organization_id,
            "role": payload.role
        })),
    )
        .into_response()
}

/// DELETE /organizations/{org_id}/users/{user_id} - Remove a member.
async fn remove_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, user_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let org_repo = OrganizationRepository::new((*state.db).clone());

    match org_repo.has_role(org_id, auth.user_id(), UserRole::Admin).await {
        Ok(true) => {}
        Ok(false) => return forbidden(),
        Err(e) => {
            error!(error = %e, "Database error checking role");
            return internal_error();
        }
    }

    // Owners cannot be removed.
    match org_repo.get_user_membership(org_id, user_id).await {
        Ok(Some(m)) if m.role == UserRole::Owner => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "cannot_remove_owner",
                    "message": "The organization owner cannot be removed"
                })),
            )
                .into_response();
        }
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_a_member",
                    "message": "User is not a member of this organization"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error checking membership");
            return internal_error();
        }
    }

    match org_repo.remove_user(org_id, user_id).await {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_a_member",
                    "message": "User is not a member of this organization"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to remove member");
            return internal_error();
        }
    }

    // Kill their sessions for this organization.
    let session_repo = SessionRepository::new((*state.db).clone());
    if let Err(e) = session_repo.revoke_user_org_sessions(user_id, org_id).await {
        warn!(error = %e, "Failed to revoke sessions for removed member");
    }

    info!(org_id = %org_id, user_id = %user_id, "Member removed");

    (StatusCode::OK, Json(json!({ "message": "Member removed" }))).into_response()
}
