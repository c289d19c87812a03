//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use crate::routes::{ensure_member, ensure_role, internal_error};
use obralis_core::ledger::AccountType;
use obralis_db::entities::sea_orm_active_enums::UserRole;
use obralis_db::repositories::account::{AccountError, AccountRepository, CreateAccountInput};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/accounts", get(list_accounts))
        .route("/organizations/{org_id}/accounts", post(create_account))
        .route(
            "/organizations/{org_id}/accounts/{account_id}",
            get(get_account),
        )
        .route(
            "/organizations/{org_id}/accounts/{account_id}",
            put(update_account),
        )
        .route(
            "/organizations/{org_id}/accounts/{account_id}",
            delete(delete_account),
        )
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    /// Include deactivated accounts.
    pub include_inactive: Option<bool>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code (unique within the organization).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type: asset, liability, equity, revenue, expense.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Parent account for hierarchical charts.
    pub parent_id: Option<Uuid>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// New account name.
    pub name: Option<String>,
    /// Activate or deactivate the account.
    pub is_active: Option<bool>,
}

fn account_json(account: &obralis_db::entities::chart_accounts::Model) -> serde_json::Value {
    let account_type: AccountType = account.account_type.into();
    json!({
        "id": account.id,
        "code": account.code,
        "name": account.name,
        "type": account_type.as_str(),
        "parent_id": account.parent_id,
        "is_active": account.is_active,
        "created_at": account.created_at
    })
}

fn account_error_response(e: &AccountError) -> Response {
    let (status, error): (StatusCode, &str) = match e {
        AccountError::NotFound(_) => (StatusCode::NOT_FOUND, "account_not_found"),
        AccountError::DuplicateCode(_) => (StatusCode::CONFLICT, "duplicate_code"),
        AccountError::ParentNotFound(_) => (StatusCode::UNPROCESSABLE_ENTITY, "parent_not_found"),
        AccountError::ParentTypeMismatch => {
            (StatusCode::UNPROCESSABLE_ENTITY, "parent_type_mismatch")
        }
        AccountError::HasChildren => (StatusCode::CONFLICT, "has_children"),
        AccountError::HasLines => (StatusCode::CONFLICT, "has_journal_lines"),
        AccountError::Database(err) => {
            error!(error = %err, "Database error in account operation");
            return internal_error();
        }
    };
    (
        status,
        Json(json!({ "error": error, "message": e.to_string() })),
    )
        .into_response()
}

/// GET /organizations/{org_id}/accounts - List the chart of accounts.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let account_type = match query.account_type.as_deref() {
        Some(raw) => match AccountType::from_str(raw) {
            Ok(t) => Some(t),
            Err(_) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "error": "invalid_type",
                        "message": format!("Unknown account type: {raw}")
                    })),
                )
                    .into_response();
            }
        },
        None => None,
    };

    let repo = AccountRepository::new((*state.db).clone());
    match repo
        .list(
            org_id,
            account_type.map(Into::into),
            query.include_inactive.unwrap_or(false),
        )
        .await
    {
        Ok(accounts) => {
            let accounts: Vec<_> = accounts.iter().map(account_json).collect();
            (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing accounts");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/accounts - Create an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Admin).await {
        return response;
    }

    let Ok(account_type) = AccountType::from_str(&payload.account_type) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "invalid_type",
                "message": format!("Unknown account type: {}", payload.account_type)
            })),
        )
            .into_response();
    };

    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        organization_id: org_id,
        parent_id: payload.parent_id,
        code: payload.code,
        name: payload.name,
        account_type: account_type.into(),
    };

    match repo.create(input).await {
        Ok(account) => {
            info!(org_id = %org_id, account_id = %account.id, "Account created");
            (StatusCode::CREATED, Json(account_json(&account))).into_response()
        }
        Err(e) => account_error_response(&e),
    }
}

/// GET /organizations/{org_id}/accounts/{account_id} - Get an account.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, account_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = AccountRepository::new((*state.db).clone());
    match repo.find_by_id(org_id, account_id).await {
        Ok(Some(account)) => (StatusCode::OK, Json(account_json(&account))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "account_not_found", "message": "Account not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Database error fetching account");
            internal_error()
        }
    }
}

/// PUT /organizations/{org_id}/accounts/{account_id} - Update an account.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, account_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Admin).await {
        return response;
    }

    let repo = AccountRepository::new((*state.db).clone());
    match repo
        .update(org_id, account_id, payload.name, payload.is_active)
        .await
    {
        Ok(account) => (StatusCode::OK, Json(account_json(&account))).into_response(),
        Err(e) => account_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/accounts/{account_id} - Delete an account.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, account_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Admin).await {
        return response;
    }

    let repo = AccountRepository::new((*state.db).clone());
    match repo.delete(org_id, account_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Account deleted" })),
        )
            .into_response(),
        Err(e) => account_error_response(&e),
    }
}
