//! Treasury routes: cash boxes, bank accounts, transactions,
//! transfers and balances.

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
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{ensure_member, ensure_role, internal_error, require_currency};
use crate::{AppState, middleware::AuthUser};
use obralis_core::balance::Direction;
use obralis_db::entities::sea_orm_active_enums::{TreasuryAccountKind, UserRole};
use obralis_db::repositories::journal::JournalError;
use obralis_db::repositories::treasury::{
    CreateTransactionInput, CreateTreasuryAccountInput, TransactionFilter, TransferInput,
    TreasuryError, TreasuryRepository, UpdateTransactionInput,
};
use obralis_shared::types::PageRequest;

/// Creates the treasury routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/treasury/accounts",
            get(list_accounts).post(create_account),
        )
        .route(
            "/organizations/{org_id}/treasury/accounts/{account_id}",
            get(get_account).put(update_account),
        )
        .route(
            "/organizations/{org_id}/treasury/balances",
            get(list_balances),
        )
        .route(
            "/organizations/{org_id}/treasury/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/organizations/{org_id}/treasury/transactions/{transaction_id}",
            get(get_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
        .route(
            "/organizations/{org_id}/treasury/transfers",
            post(create_transfer),
        )
        .route(
            "/organizations/{org_id}/treasury/transfers/{group_id}",
            delete(delete_transfer),
        )
}

/// Request body for creating a treasury account.
#[derive(Debug, Deserialize)]
pub struct CreateTreasuryAccountRequest {
    /// Display name.
    pub name: String,
    /// cash_box or bank_account.
    pub kind: TreasuryAccountKind,
    /// Account currency code.
    pub currency: String,
    /// Ledger account for auto-posting.
    pub ledger_account_id: Option<Uuid>,
}

/// Request body for updating a treasury account.
#[derive(Debug, Deserialize)]
pub struct UpdateTreasuryAccountRequest {
    /// New display name.
    pub name: Option<String>,
    /// Replace the ledger account (`null` clears it).
    #[serde(default, with = "crate::routes::double_option")]
    pub ledger_account_id: Option<Option<Uuid>>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Request body for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Treasury account money moves through.
    pub treasury_account_id: Uuid,
    /// income or expense.
    pub direction: Direction,
    /// Positive amount.
    pub amount: Decimal,
    /// Date of the movement.
    pub transaction_date: NaiveDate,
    /// Free-form description.
    pub description: String,
    /// Category ledger account for auto-posting.
    pub category_account_id: Option<Uuid>,
}

/// Request body for updating a transaction.
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// Move to another treasury account.
    pub treasury_account_id: Option<Uuid>,
    /// Flip the direction.
    pub direction: Option<Direction>,
    /// New positive amount.
    pub amount: Option<Decimal>,
    /// New date.
    pub transaction_date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// Replace the category account (`null` clears it).
    #[serde(default, with = "crate::routes::double_option")]
    pub category_account_id: Option<Option<Uuid>>,
}

/// Request body for a transfer between accounts.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Source account.
    pub from_account_id: Uuid,
    /// Destination account.
    pub to_account_id: Uuid,
    /// Positive amount to move.
    pub amount: Decimal,
    /// Date of the transfer.
    pub transaction_date: NaiveDate,
    /// Free-form description.
    pub description: String,
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Restrict to one treasury account.
    pub account_id: Option<Uuid>,
    /// Restrict to one direction.
    pub direction: Option<Direction>,
    /// Inclusive lower date bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub date_to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

fn account_json(account: &obralis_db::entities::treasury_accounts::Model) -> serde_json::Value {
    json!({
        "id": account.id,
        "name": account.name,
        "kind": account.kind,
        "currency": account.currency,
        "ledger_account_id": account.ledger_account_id,
        "is_active": account.is_active,
        "created_at": account.created_at
    })
}

fn transaction_json(
    txn: &obralis_db::entities::treasury_transactions::Model,
) -> serde_json::Value {
    json!({
        "id": txn.id,
        "treasury_account_id": txn.treasury_account_id,
        "direction": txn.direction,
        "amount": txn.amount,
        "currency": txn.currency,
        "transaction_date": txn.transaction_date,
        "description": txn.description,
        "category_account_id": txn.category_account_id,
        "reference": txn.reference,
        "transfer_group_id": txn.transfer_group_id,
        "created_at": txn.created_at
    })
}

pub(crate) fn treasury_error_response(e: &TreasuryError) -> Response {
    let (status, error): (StatusCode, &str) = match e {
        TreasuryError::AccountNotFound(_) => (StatusCode::NOT_FOUND, "account_not_found"),
        TreasuryError::TransactionNotFound(_) => {
            (StatusCode::NOT_FOUND, "transaction_not_found")
        }
        TreasuryError::AccountInactive(_) => (StatusCode::UNPROCESSABLE_ENTITY, "account_inactive"),
        TreasuryError::PaymentLinked(_) => (StatusCode::CONFLICT, "payment_linked"),
        TreasuryError::TransferLeg(_) => (StatusCode::CONFLICT, "transfer_leg"),
        TreasuryError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_transaction"),
        TreasuryError::Journal(inner) => return journal_error_response(inner),
        TreasuryError::InvalidCurrency(_) | TreasuryError::Database(_) => {
            error!(error = %e, "Treasury operation failed");
            return internal_error();
        }
    };
    (
        status,
        Json(json!({ "error": error, "message": e.to_string() })),
    )
        .into_response()
}

fn journal_error_response(e: &JournalError) -> Response {
    match e {
        JournalError::AccountNotFound(_)
        | JournalError::AccountInactive(_)
        | JournalError::AccountNotPostable(_)
        | JournalError::Validation(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "auto_posting_failed", "message": e.to_string() })),
        )
            .into_response(),
        _ => {
            error!(error = %e, "Auto-posting failed");
            internal_error()
        }
    }
}

/// GET /organizations/{org_id}/treasury/accounts - List treasury accounts.
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    match repo.list_accounts(org_id, false).await {
        Ok(accounts) => {
            let accounts: Vec<_> = accounts.iter().map(account_json).collect();
            (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing treasury accounts");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/treasury/accounts - Create a treasury account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateTreasuryAccountRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Admin).await {
        return response;
    }

    let currency = match require_currency(&payload.currency) {
        Ok(currency) => currency,
        Err(response) => return response,
    };

    let repo = TreasuryRepository::new((*state.db).clone());
    let input = CreateTreasuryAccountInput {
        name: payload.name,
        kind: payload.kind,
        currency,
        ledger_account_id: payload.ledger_account_id,
    };

    match repo.create_account(org_id, input).await {
        Ok(account) => {
            info!(org_id = %org_id, account_id = %account.id, "Treasury account created");
            (StatusCode::CREATED, Json(account_json(&account))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create treasury account");
            internal_error()
        }
    }
}

/// GET /organizations/{org_id}/treasury/accounts/{account_id}
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, account_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    match repo.get_account(org_id, account_id).await {
        Ok(account) => (StatusCode::OK, Json(account_json(&account))).into_response(),
        Err(e) => treasury_error_response(&e),
    }
}

/// PUT /organizations/{org_id}/treasury/accounts/{account_id}
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, account_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTreasuryAccountRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Admin).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    match repo
        .update_account(
            org_id,
            account_id,
            payload.name,
            payload.ledger_account_id,
            payload.is_active,
        )
        .await
    {
        Ok(account) => (StatusCode::OK, Json(account_json(&account))).into_response(),
        Err(e) => treasury_error_response(&e),
    }
}

/// GET /organizations/{org_id}/treasury/balances - Stored balances.
async fn list_balances(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    match repo.balances(org_id).await {
        Ok(balances) => {
            let balances: Vec<_> = balances
                .iter()
                .map(|b| {
                    json!({
                        "treasury_account_id": b.treasury_account_id,
                        "currency": b.currency,
                        "balance": b.balance,
                        "updated_at": b.updated_at
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "balances": balances }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing balances");
            internal_error()
        }
    }
}

/// GET /organizations/{org_id}/treasury/transactions - List transactions.
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    let filter = TransactionFilter {
        treasury_account_id: query.account_id,
        direction: query.direction,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    match repo.list_transactions(org_id, filter, &page).await {
        Ok(page) => {
            let transactions: Vec<_> = page.data.iter().map(transaction_json).collect();
            (
                StatusCode::OK,
                Json(json!({ "transactions": transactions, "meta": page.meta })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing transactions");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/treasury/transactions - Record a transaction.
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    let input = CreateTransactionInput {
        treasury_account_id: payload.treasury_account_id,
        direction: payload.direction,
        amount: payload.amount,
        transaction_date: payload.transaction_date,
        description: payload.description,
        category_account_id: payload.category_account_id,
        created_by: Some(auth.user_id()),
    };

    match repo.create_transaction(org_id, input).await {
        Ok(txn) => {
            info!(org_id = %org_id, transaction_id = %txn.id, "Transaction recorded");
            (StatusCode::CREATED, Json(transaction_json(&txn))).into_response()
        }
        Err(e) => treasury_error_response(&e),
    }
}

/// GET /organizations/{org_id}/treasury/transactions/{transaction_id}
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    match repo.get_transaction(org_id, transaction_id).await {
        Ok(txn) => (StatusCode::OK, Json(transaction_json(&txn))).into_response(),
        Err(e) => treasury_error_response(&e),
    }
}

/// PATCH /organizations/{org_id}/treasury/transactions/{transaction_id}
async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, transaction_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    let input = UpdateTransactionInput {
        treasury_account_id: payload.treasury_account_id,
        direction: payload.direction,
        amount: payload.amount,
        transaction_date: payload.transaction_date,
        description: payload.description,
        category_account_id: payload.category_account_id,
    };

    match repo.update_transaction(org_id, transaction_id, input).await {
        Ok(txn) => (StatusCode::OK, Json(transaction_json(&txn))).into_response(),
        Err(e) => treasury_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/treasury/transactions/{transaction_id}
async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    match repo.delete_transaction(org_id, transaction_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Transaction deleted" })),
        )
            .into_response(),
        Err(e) => treasury_error_response(&e),
    }
}

/// POST /organizations/{org_id}/treasury/transfers - Move money between accounts.
async fn create_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<TransferRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    let input = TransferInput {
        from_account_id: payload.from_account_id,
        to_account_id: payload.to_account_id,
        amount: payload.amount,
        transaction_date: payload.transaction_date,
        description: payload.description,
        created_by: Some(auth.user_id()),
    };

    match repo.transfer(org_id, input).await {
        Ok((expense_leg, income_leg)) => {
            info!(
                org_id = %org_id,
                group_id = ?expense_leg.transfer_group_id,
                "Transfer recorded"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "transfer_group_id": expense_leg.transfer_group_id,
                    "expense_leg": transaction_json(&expense_leg),
                    "income_leg": transaction_json(&income_leg)
                })),
            )
                .into_response()
        }
        Err(e) => treasury_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/treasury/transfers/{group_id}
async fn delete_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, group_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = TreasuryRepository::new((*state.db).clone());
    match repo.delete_transfer(org_id, group_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Transfer deleted" })),
        )
            .into_response(),
        Err(e) => treasury_error_response(&e),
    }
}
