//! Financial report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::routes::{ensure_member, internal_error};
use crate::{AppState, middleware::AuthUser};
use obralis_db::repositories::report::{ReportError, ReportRepository};

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/reports/trial-balance",
            get(trial_balance),
        )
        .route(
            "/organizations/{org_id}/reports/balance-sheet",
            get(balance_sheet),
        )
        .route(
            "/organizations/{org_id}/reports/income-statement",
            get(income_statement),
        )
}

/// Query parameters for point-in-time reports.
#[derive(Debug, Deserialize)]
pub struct AsOfQuery {
    /// Report date; defaults to today.
    pub as_of: Option<NaiveDate>,
}

/// Query parameters for period reports.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// Inclusive period start.
    pub period_start: NaiveDate,
    /// Inclusive period end.
    pub period_end: NaiveDate,
}

fn report_error_response(e: &ReportError) -> Response {
    match e {
        ReportError::OrganizationNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "organization_not_found", "message": e.to_string() })),
        )
            .into_response(),
        ReportError::InvalidAccountType(_)
        | ReportError::InvalidCurrency(_)
        | ReportError::Database(_) => {
            error!(error = %e, "Report generation failed");
            internal_error()
        }
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// GET /organizations/{org_id}/reports/trial-balance
async fn trial_balance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<AsOfQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .trial_balance(org_id, query.as_of.unwrap_or_else(today))
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET /organizations/{org_id}/reports/balance-sheet
async fn balance_sheet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<AsOfQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .balance_sheet(org_id, query.as_of.unwrap_or_else(today))
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET /organizations/{org_id}/reports/income-statement
async fn income_statement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    if query.period_start > query.period_end {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "invalid_period",
                "message": "period_start must not be after period_end"
            })),
        )
            .into_response();
    }

    let repo = ReportRepository::new((*state.db).clone());
    match repo
        .income_statement(org_id, query.period_start, query.period_end)
        .await
    {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}
