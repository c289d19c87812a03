//! Check routes: issued and received checks with lifecycle
//! transitions.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::treasury::treasury_error_response;
use crate::routes::{ensure_member, ensure_role, internal_error, require_currency};
use crate::{AppState, middleware::AuthUser};
use obralis_core::treasury::check::{CheckKind, CheckStatus};
use obralis_db::entities::sea_orm_active_enums::UserRole;
use obralis_db::repositories::check::{
    CheckError, CheckRepository, CreateCheckInput, TransitionInput,
};

/// Creates the check routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/checks",
            get(list_checks).post(create_check),
        )
        .route(
            "/organizations/{org_id}/checks/{check_id}",
            get(get_check).delete(delete_check),
        )
        .route(
            "/organizations/{org_id}/checks/{check_id}/transition",
            post(transition_check),
        )
}

/// Request body for registering a check.
#[derive(Debug, Deserialize)]
pub struct CreateCheckRequest {
    /// issued or received.
    pub kind: CheckKind,
    /// Check number as printed.
    pub number: String,
    /// Payee for issued checks, drawer for received ones.
    pub counterparty: String,
    /// Positive face amount.
    pub amount: Decimal,
    /// Check currency code.
    pub currency: String,
    /// Date written.
    pub issue_date: NaiveDate,
    /// Deferred-payment date, if any.
    pub due_date: Option<NaiveDate>,
    /// Treasury account to settle against, if already known.
    pub treasury_account_id: Option<Uuid>,
}

/// Request body for a lifecycle transition.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Target status.
    pub to: CheckStatus,
    /// Date funds moved; required for settling transitions.
    pub settlement_date: Option<NaiveDate>,
    /// Settlement account, overriding the one stored on the check.
    pub treasury_account_id: Option<Uuid>,
}

/// Query parameters for listing checks.
#[derive(Debug, Deserialize)]
pub struct ListChecksQuery {
    /// Restrict to one kind.
    pub kind: Option<CheckKind>,
}

fn check_json(check: &obralis_db::entities::checks::Model) -> serde_json::Value {
    json!({
        "id": check.id,
        "kind": check.kind,
        "status": check.status,
        "number": check.number,
        "counterparty": check.counterparty,
        "amount": check.amount,
        "currency": check.currency,
        "issue_date": check.issue_date,
        "due_date": check.due_date,
        "treasury_account_id": check.treasury_account_id,
        "settlement_transaction_id": check.settlement_transaction_id,
        "created_at": check.created_at
    })
}

fn check_error_response(e: &CheckError) -> Response {
    let (status, error): (StatusCode, &str) = match e {
        CheckError::NotFound(_) => (StatusCode::NOT_FOUND, "check_not_found"),
        CheckError::MissingTreasuryAccount(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "missing_treasury_account")
        }
        CheckError::MissingSettlementDate => {
            (StatusCode::UNPROCESSABLE_ENTITY, "missing_settlement_date")
        }
        CheckError::CurrencyMismatch { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "currency_mismatch")
        }
        CheckError::Lifecycle(_) | CheckError::Validation(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invalid_transition")
        }
        CheckError::AlreadySettled(_) => (StatusCode::CONFLICT, "check_settled"),
        CheckError::Treasury(inner) => return treasury_error_response(inner),
        CheckError::Database(_) => {
            error!(error = %e, "Check operation failed");
            return internal_error();
        }
    };
    (
        status,
        Json(json!({ "error": error, "message": e.to_string() })),
    )
        .into_response()
}

/// GET /organizations/{org_id}/checks - List checks.
async fn list_checks(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListChecksQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = CheckRepository::new((*state.db).clone());
    match repo.list(org_id, query.kind).await {
        Ok(checks) => {
            let checks: Vec<_> = checks.iter().map(check_json).collect();
            (StatusCode::OK, Json(json!({ "checks": checks }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing checks");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/checks - Register a check.
async fn create_check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateCheckRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let currency = match require_currency(&payload.currency) {
        Ok(currency) => currency,
        Err(response) => return response,
    };

    let repo = CheckRepository::new((*state.db).clone());
    let input = CreateCheckInput {
        kind: payload.kind,
        number: payload.number,
        counterparty: payload.counterparty,
        amount: payload.amount,
        currency: currency.to_string(),
        issue_date: payload.issue_date,
        due_date: payload.due_date,
        treasury_account_id: payload.treasury_account_id,
        created_by: Some(auth.user_id()),
    };

    match repo.create(org_id, input).await {
        Ok(check) => {
            info!(org_id = %org_id, check_id = %check.id, "Check registered");
            (StatusCode::CREATED, Json(check_json(&check))).into_response()
        }
        Err(e) => check_error_response(&e),
    }
}

/// GET /organizations/{org_id}/checks/{check_id}
async fn get_check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, check_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = CheckRepository::new((*state.db).clone());
    match repo.get(org_id, check_id).await {
        Ok(check) => (StatusCode::OK, Json(check_json(&check))).into_response(),
        Err(e) => check_error_response(&e),
    }
}

/// POST /organizations/{org_id}/checks/{check_id}/transition - Move the
/// check through its lifecycle; settling transitions move funds.
async fn transition_check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, check_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<TransitionRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = CheckRepository::new((*state.db).clone());
    let input = TransitionInput {
        to: payload.to,
        settlement_date: payload.settlement_date,
        treasury_account_id: payload.treasury_account_id,
    };

    match repo.transition(org_id, check_id, input).await {
        Ok(check) => {
            info!(org_id = %org_id, check_id = %check_id, status = ?check.status, "Check transitioned");
            (StatusCode::OK, Json(check_json(&check))).into_response()
        }
        Err(e) => check_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/checks/{check_id}
async fn delete_check(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, check_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = CheckRepository::new((*state.db).clone());
    match repo.delete(org_id, check_id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Check deleted" }))).into_response(),
        Err(e) => check_error_response(&e),
    }
}
