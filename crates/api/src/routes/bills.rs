//! Billing routes: client and provider bills plus their payments.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
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
use obralis_core::billing::{BillKind, BillStatus};
use obralis_shared::types::PageRequest;
use obralis_db::entities::sea_orm_active_enums::UserRole;
use obralis_db::repositories::billing::{
    BillFilter, BillingError, BillingRepository, CreateBillInput, CreatePaymentInput,
    UpdateBillInput, UpdatePaymentInput,
};

/// Creates the billing routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/bills",
            get(list_bills).post(create_bill),
        )
        .route(
            "/organizations/{org_id}/bills/{bill_id}",
            get(get_bill).patch(update_bill).delete(delete_bill),
        )
        .route(
            "/organizations/{org_id}/bills/{bill_id}/payments",
            get(list_payments).post(create_payment),
        )
        .route(
            "/organizations/{org_id}/payments/{payment_id}",
            patch(update_payment).delete(delete_payment),
        )
}

/// Request body for creating a bill.
#[derive(Debug, Deserialize)]
pub struct CreateBillRequest {
    /// client or provider.
    pub kind: BillKind,
    /// Client or provider name.
    pub counterparty: String,
    /// What the bill is for.
    pub description: String,
    /// Date the bill was issued.
    pub issue_date: NaiveDate,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Positive bill total.
    pub total: Decimal,
    /// Bill currency code.
    pub currency: String,
    /// Category ledger account for auto-posting.
    pub category_account_id: Option<Uuid>,
}

/// Request body for updating a bill.
#[derive(Debug, Deserialize)]
pub struct UpdateBillRequest {
    /// New counterparty name.
    pub counterparty: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New issue date.
    pub issue_date: Option<NaiveDate>,
    /// Replace the due date (`null` clears it).
    #[serde(default, with = "crate::routes::double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    /// New positive total.
    pub total: Option<Decimal>,
    /// Replace the category account (`null` clears it).
    #[serde(default, with = "crate::routes::double_option")]
    pub category_account_id: Option<Option<Uuid>>,
}

/// Request body for registering a payment against a bill.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Treasury account money moves through.
    pub treasury_account_id: Uuid,
    /// Positive payment amount in the bill's currency.
    pub amount: Decimal,
    /// Date money moved.
    pub payment_date: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
}

/// Request body for updating a payment.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    /// Move the payment to another treasury account.
    pub treasury_account_id: Option<Uuid>,
    /// New positive amount.
    pub amount: Option<Decimal>,
    /// New date.
    pub payment_date: Option<NaiveDate>,
    /// Replace the note (`null` clears it).
    #[serde(default, with = "crate::routes::double_option")]
    pub note: Option<Option<String>>,
}

/// Query parameters for listing bills.
#[derive(Debug, Deserialize)]
pub struct ListBillsQuery {
    /// Restrict to one kind.
    pub kind: Option<BillKind>,
    /// Restrict to one status.
    pub status: Option<BillStatus>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

fn bill_json(bill: &obralis_db::entities::bills::Model) -> serde_json::Value {
    json!({
        "id": bill.id,
        "kind": bill.kind,
        "counterparty": bill.counterparty,
        "description": bill.description,
        "issue_date": bill.issue_date,
        "due_date": bill.due_date,
        "total": bill.total,
        "currency": bill.currency,
        "status": bill.status,
        "category_account_id": bill.category_account_id,
        "created_at": bill.created_at
    })
}

fn payment_json(payment: &obralis_db::entities::payments::Model) -> serde_json::Value {
    json!({
        "id": payment.id,
        "bill_id": payment.bill_id,
        "treasury_account_id": payment.treasury_account_id,
        "amount": payment.amount,
        "currency": payment.currency,
        "payment_date": payment.payment_date,
        "note": payment.note,
        "created_at": payment.created_at
    })
}

fn billing_error_response(e: &BillingError) -> Response {
    let (status, error): (StatusCode, &str) = match e {
        BillingError::BillNotFound(_) => (StatusCode::NOT_FOUND, "bill_not_found"),
        BillingError::PaymentNotFound(_) => (StatusCode::NOT_FOUND, "payment_not_found"),
        BillingError::NonPositiveTotal | BillingError::TotalBelowPaid { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "invalid_total")
        }
        BillingError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_payment"),
        BillingError::HasPayments => (StatusCode::CONFLICT, "bill_has_payments"),
        BillingError::Treasury(inner) => return treasury_error_response(inner),
        BillingError::Journal(inner) => return journal_fallback(inner),
        BillingError::LinkedTransactionMissing(_) | BillingError::Database(_) => {
            error!(error = %e, "Billing operation failed");
            return internal_error();
        }
    };
    (
        status,
        Json(json!({ "error": error, "message": e.to_string() })),
    )
        .into_response()
}

fn journal_fallback(e: &obralis_db::repositories::journal::JournalError) -> Response {
    use obralis_db::repositories::journal::JournalError;
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

/// GET /organizations/{org_id}/bills - List bills.
async fn list_bills(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListBillsQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = BillingRepository::new((*state.db).clone());
    let filter = BillFilter {
        kind: query.kind,
        status: query.status,
    };

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    match repo.list_bills(org_id, filter, &page).await {
        Ok(page) => {
            let bills: Vec<_> = page.data.iter().map(bill_json).collect();
            (StatusCode::OK, Json(json!({ "bills": bills, "meta": page.meta }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing bills");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/bills - Create a bill.
async fn create_bill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateBillRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let currency = match require_currency(&payload.currency) {
        Ok(currency) => currency,
        Err(response) => return response,
    };

    let repo = BillingRepository::new((*state.db).clone());
    let input = CreateBillInput {
        kind: payload.kind,
        counterparty: payload.counterparty,
        description: payload.description,
        issue_date: payload.issue_date,
        due_date: payload.due_date,
        total: payload.total,
        currency: currency.to_string(),
        category_account_id: payload.category_account_id,
        created_by: Some(auth.user_id()),
    };

    match repo.create_bill(org_id, input).await {
        Ok(bill) => {
            info!(org_id = %org_id, bill_id = %bill.id, "Bill created");
            (StatusCode::CREATED, Json(bill_json(&bill))).into_response()
        }
        Err(e) => billing_error_response(&e),
    }
}

/// GET /organizations/{org_id}/bills/{bill_id}
async fn get_bill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, bill_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = BillingRepository::new((*state.db).clone());
    match repo.get_bill(org_id, bill_id).await {
        Ok(bill) => (StatusCode::OK, Json(bill_json(&bill))).into_response(),
        Err(e) => billing_error_response(&e),
    }
}

/// PATCH /organizations/{org_id}/bills/{bill_id}
async fn update_bill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, bill_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateBillRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = BillingRepository::new((*state.db).clone());
    let input = UpdateBillInput {
        counterparty: payload.counterparty,
        description: payload.description,
        issue_date: payload.issue_date,
        due_date: payload.due_date,
        total: payload.total,
        category_account_id: payload.category_account_id,
    };

    match repo.update_bill(org_id, bill_id, input).await {
        Ok(bill) => (StatusCode::OK, Json(bill_json(&bill))).into_response(),
        Err(e) => billing_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/bills/{bill_id}
async fn delete_bill(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, bill_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = BillingRepository::new((*state.db).clone());
    match repo.delete_bill(org_id, bill_id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Bill deleted" }))).into_response(),
        Err(e) => billing_error_response(&e),
    }
}

/// GET /organizations/{org_id}/bills/{bill_id}/payments - Payments for one bill.
async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, bill_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = BillingRepository::new((*state.db).clone());
    match repo.list_payments(org_id, bill_id).await {
        Ok(payments) => {
            let payments: Vec<_> = payments.iter().map(payment_json).collect();
            (StatusCode::OK, Json(json!({ "payments": payments }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing payments");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/bills/{bill_id}/payments - Register a payment.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, bill_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = BillingRepository::new((*state.db).clone());
    let input = CreatePaymentInput {
        treasury_account_id: payload.treasury_account_id,
        amount: payload.amount,
        payment_date: payload.payment_date,
        note: payload.note,
        created_by: Some(auth.user_id()),
    };

    match repo.create_payment(org_id, bill_id, input).await {
        Ok(payment) => {
            info!(org_id = %org_id, bill_id = %bill_id, payment_id = %payment.id, "Payment registered");
            (StatusCode::CREATED, Json(payment_json(&payment))).into_response()
        }
        Err(e) => billing_error_response(&e),
    }
}

/// PATCH /organizations/{org_id}/payments/{payment_id}
async fn update_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, payment_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = BillingRepository::new((*state.db).clone());
    let input = UpdatePaymentInput {
        treasury_account_id: payload.treasury_account_id,
        amount: payload.amount,
        payment_date: payload.payment_date,
        note: payload.note,
    };

    match repo.update_payment(org_id, payment_id, input).await {
        Ok(payment) => (StatusCode::OK, Json(payment_json(&payment))).into_response(),
        Err(e) => billing_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/payments/{payment_id}
async fn delete_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, payment_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = BillingRepository::new((*state.db).clone());
    match repo.delete_payment(org_id, payment_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Payment deleted" })),
        )
            .into_response(),
        Err(e) => billing_error_response(&e),
    }
}
