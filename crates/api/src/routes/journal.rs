//! Manual journal entry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{ensure_member, ensure_role, internal_error};
use crate::{AppState, middleware::AuthUser};
use obralis_core::ledger::{JournalLineInput, JournalSide, NewJournalEntry};
use obralis_db::entities::sea_orm_active_enums::UserRole;
use obralis_db::repositories::journal::{EntryWithLines, JournalError, JournalRepository};

/// Creates the journal routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/organizations/{org_id}/journal", get(list_entries))
        .route("/organizations/{org_id}/journal", post(create_entry))
        .route("/organizations/{org_id}/journal/{entry_id}", get(get_entry))
        .route(
            "/organizations/{org_id}/journal/{entry_id}",
            delete(delete_entry),
        )
}

/// Query parameters for listing entries.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Inclusive lower date bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub date_to: Option<NaiveDate>,
}

/// One line of a manual journal entry.
#[derive(Debug, Deserialize)]
pub struct JournalLineRequest {
    /// Ledger account to post to.
    pub account_id: Uuid,
    /// debit or credit.
    pub side: String,
    /// Positive line amount.
    pub amount: Decimal,
    /// Optional line memo.
    pub memo: Option<String>,
}

/// Request body for creating a manual journal entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Date of the entry.
    pub entry_date: NaiveDate,
    /// What the entry records.
    pub description: String,
    /// Debit and credit lines.
    pub lines: Vec<JournalLineRequest>,
}

fn entry_json(entry: &EntryWithLines) -> serde_json::Value {
    let lines: Vec<_> = entry
        .lines
        .iter()
        .map(|line| {
            let side: JournalSide = line.side.into();
            json!({
                "id": line.id,
                "account_id": line.account_id,
                "side": side.as_str(),
                "amount": line.amount,
                "memo": line.memo
            })
        })
        .collect();

    json!({
        "id": entry.entry.id,
        "entry_date": entry.entry.entry_date,
        "description": entry.entry.description,
        "source": entry.entry.source,
        "source_id": entry.entry.source_id,
        "lines": lines,
        "created_at": entry.entry.created_at
    })
}

fn journal_error_response(e: &JournalError) -> Response {
    let (status, error): (StatusCode, &str) = match e {
        JournalError::NotFound(_) => (StatusCode::NOT_FOUND, "entry_not_found"),
        JournalError::AccountNotFound(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "account_not_found")
        }
        JournalError::AccountInactive(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "account_inactive")
        }
        JournalError::AccountNotPostable(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "account_not_postable")
        }
        JournalError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_entry"),
        JournalError::NotManual => (StatusCode::CONFLICT, "not_manual"),
        JournalError::Database(err) => {
            error!(error = %err, "Database error in journal operation");
            return internal_error();
        }
    };
    (
        status,
        Json(json!({ "error": error, "message": e.to_string() })),
    )
        .into_response()
}

/// GET /organizations/{org_id}/journal - List journal entries.
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListEntriesQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    match repo.list(org_id, query.date_from, query.date_to).await {
        Ok(entries) => {
            let entries: Vec<_> = entries
                .iter()
                .map(|entry| {
                    json!({
                        "id": entry.id,
                        "entry_date": entry.entry_date,
                        "description": entry.description,
                        "source": entry.source,
                        "source_id": entry.source_id,
                        "created_at": entry.created_at
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "entries": entries }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing journal entries");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/journal - Create a manual entry.
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateEntryRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let mut lines = Vec::with_capacity(payload.lines.len());
    for line in payload.lines {
        let Ok(side) = JournalSide::from_str(&line.side) else {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": "invalid_side",
                    "message": format!("Unknown journal side: {}", line.side)
                })),
            )
                .into_response();
        };
        lines.push(JournalLineInput {
            account_id: line.account_id,
            side,
            amount: line.amount,
            memo: line.memo,
        });
    }

    let input = NewJournalEntry {
        entry_date: payload.entry_date,
        description: payload.description,
        lines,
    };

    let repo = JournalRepository::new((*state.db).clone());
    match repo.create_manual(org_id, input, auth.user_id()).await {
        Ok(entry) => {
            info!(org_id = %org_id, entry_id = %entry.entry.id, "Manual journal entry created");
            (StatusCode::CREATED, Json(entry_json(&entry))).into_response()
        }
        Err(e) => journal_error_response(&e),
    }
}

/// GET /organizations/{org_id}/journal/{entry_id} - Get an entry with lines.
async fn get_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, entry_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    match repo.get(org_id, entry_id).await {
        Ok(entry) => (StatusCode::OK, Json(entry_json(&entry))).into_response(),
        Err(e) => journal_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/journal/{entry_id} - Delete a manual entry.
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, entry_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = JournalRepository::new((*state.db).clone());
    match repo.delete_manual(org_id, entry_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Journal entry deleted" })),
        )
            .into_response(),
        Err(e) => journal_error_response(&e),
    }
}
