//! Billing repository: client and provider bills and their payments.
//!
//! A payment carries a shadow treasury transaction (referenced
//! `BILL-{payment_id}` or `COLL-{payment_id}`) so collections and
//! disbursements show up in cash-box and bank balances. The payment
//! row, its transaction, the balance adjustment and the bill status
//! recompute all commit in one database transaction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use obralis_core::balance::{
    BalanceFootprint, Direction, changes_for_create, changes_for_delete, changes_for_update,
};
use obralis_core::billing::{
    BillKind, BillingError as CoreBillingError, derive_status, validate_payment,
};
use obralis_core::ledger::{auto_entry_for_bill, auto_entry_for_payment};
use obralis_core::treasury::PaymentReference;
use obralis_shared::types::{PageRequest, PageResponse};

use crate::entities::{
    bills, organizations, payments, sea_orm_active_enums as enums, treasury_transactions,
};
use crate::repositories::journal::{self, JournalError};
use crate::repositories::treasury::{
    TreasuryError, apply_balance_changes, load_active_account, load_organization, parse_currency,
};

/// Error types for billing operations.
#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    /// Bill not found.
    #[error("Bill not found: {0}")]
    BillNotFound(Uuid),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Bill total must be positive.
    #[error("Bill total must be positive")]
    NonPositiveTotal,

    /// Cannot shrink a bill below what has already been paid.
    #[error("Bill total cannot drop below the paid total of {paid}")]
    TotalBelowPaid {
        /// Sum of live payments against the bill.
        paid: Decimal,
    },

    /// Bills with payments cannot be deleted.
    #[error("Bill has payments; delete them first")]
    HasPayments,

    /// The shadow treasury transaction for a payment is missing.
    #[error("Linked treasury transaction missing for payment {0}")]
    LinkedTransactionMissing(Uuid),

    /// Payment rule violation.
    #[error(transparent)]
    Validation(#[from] CoreBillingError),

    /// Treasury-side failure (account lookup, balance adjustment).
    #[error(transparent)]
    Treasury(#[from] TreasuryError),

    /// Auto-posting failed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a bill.
#[derive(Debug, Clone)]
pub struct CreateBillInput {
    /// Client (receivable) or provider (payable).
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
    /// Revenue/expense ledger account for auto-posting.
    pub category_account_id: Option<Uuid>,
    /// Recording user.
    pub created_by: Option<Uuid>,
}

/// Fields that can change on a bill. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateBillInput {
    /// New counterparty name.
    pub counterparty: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New issue date.
    pub issue_date: Option<NaiveDate>,
    /// Replace the due date (`Some(None)` clears it).
    pub due_date: Option<Option<NaiveDate>>,
    /// New positive total.
    pub total: Option<Decimal>,
    /// Replace the category account (`Some(None)` clears it).
    pub category_account_id: Option<Option<Uuid>>,
}

/// Input for applying a payment against a bill.
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    /// Treasury account money moves through.
    pub treasury_account_id: Uuid,
    /// Positive payment amount.
    pub amount: Decimal,
    /// Date money moved.
    pub payment_date: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
    /// Recording user.
    pub created_by: Option<Uuid>,
}

/// Fields that can change on a payment. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePaymentInput {
    /// Move the payment to another treasury account.
    pub treasury_account_id: Option<Uuid>,
    /// New positive amount.
    pub amount: Option<Decimal>,
    /// New date.
    pub payment_date: Option<NaiveDate>,
    /// Replace the note (`Some(None)` clears it).
    pub note: Option<Option<String>>,
}

/// Filters for listing bills.
#[derive(Debug, Clone, Default)]
pub struct BillFilter {
    /// Restrict to one kind.
    pub kind: Option<BillKind>,
    /// Restrict to one status.
    pub status: Option<obralis_core::billing::BillStatus>,
}

/// Billing repository for bills and payments.
#[derive(Debug, Clone)]
pub struct BillingRepository {
    db: DatabaseConnection,
}

impl BillingRepository {
    /// Creates a new billing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ---- bills ----

    /// Registers a bill.
    ///
    /// # Errors
    ///
    /// Returns an error if the total is not positive or the database
    /// operation fails.
    pub async fn create_bill(
        &self,
        organization_id: Uuid,
        input: CreateBillInput,
    ) -> Result<bills::Model, BillingError> {
        if input.total <= Decimal::ZERO {
            return Err(BillingError::NonPositiveTotal);
        }

        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();
        let model = bills::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            kind: Set(input.kind.into()),
            counterparty: Set(input.counterparty),
            description: Set(input.description),
            issue_date: Set(input.issue_date),
            due_date: Set(input.due_date),
            total: Set(input.total),
            currency: Set(input.currency),
            status: Set(derive_status(input.total, Decimal::ZERO).into()),
            category_account_id: Set(input.category_account_id),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = model.insert(&txn).await?;

        post_bill_entry(&txn, organization_id, &model).await?;

        txn.commit().await?;

        tracing::debug!(bill_id = %model.id, "Bill registered");

        Ok(model)
    }

    /// Gets a bill by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the bill is missing or the query fails.
    pub async fn get_bill(
        &self,
        organization_id: Uuid,
        bill_id: Uuid,
    ) -> Result<bills::Model, BillingError> {
        bills::Entity::find_by_id(bill_id)
            .filter(bills::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(BillingError::BillNotFound(bill_id))
    }

    /// Lists bills, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_bills(
        &self,
        organization_id: Uuid,
        filter: BillFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<bills::Model>, DbErr> {
        let mut query =
            bills::Entity::find().filter(bills::Column::OrganizationId.eq(organization_id));

        if let Some(kind) = filter.kind {
            let kind: enums::BillKind = kind.into();
            query = query.filter(bills::Column::Kind.eq(kind));
        }
        if let Some(status) = filter.status {
            let status: enums::BillStatus = status.into();
            query = query.filter(bills::Column::Status.eq(status));
        }

        let paginator = query
            .order_by_desc(bills::Column::IssueDate)
            .order_by_desc(bills::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await?;

        Ok(PageResponse::new(items, page.page, page.per_page, total))
    }

    /// Updates a bill, re-deriving its status when the total changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bill is missing, the new total is
    /// invalid or below what has been paid, or the update fails.
    pub async fn update_bill(
        &self,
        organization_id: Uuid,
        bill_id: Uuid,
        input: UpdateBillInput,
    ) -> Result<bills::Model, BillingError> {
        let txn = self.db.begin().await?;

        let bill = lock_bill(&txn, organization_id, bill_id).await?;

        let paid = paid_total(&txn, bill_id, None).await?;
        let new_total = input.total.unwrap_or(bill.total);
        if new_total <= Decimal::ZERO {
            return Err(BillingError::NonPositiveTotal);
        }
        if new_total < paid {
            return Err(BillingError::TotalBelowPaid { paid });
        }

        let mut active: bills::ActiveModel = bill.into();
        if let Some(counterparty) = input.counterparty {
            active.counterparty = Set(counterparty);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(issue_date) = input.issue_date {
            active.issue_date = Set(issue_date);
        }
        if let Some(due_date) = input.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(category) = input.category_account_id {
            active.category_account_id = Set(category);
        }
        active.total = Set(new_total);
        active.status = Set(derive_status(new_total, paid).into());
        active.updated_at = Set(chrono::Utc::now().into());
        let model = active.update(&txn).await?;

        // Re-post: the registration entry carries the bill total.
        journal::delete_auto_entries(&txn, organization_id, enums::EntrySource::Billing, bill_id)
            .await?;
        post_bill_entry(&txn, organization_id, &model).await?;

        txn.commit().await?;

        Ok(model)
    }

    /// Deletes a bill that has no payments.
    ///
    /// # Errors
    ///
    /// Returns an error if the bill is missing, still has payments, or
    /// the delete fails.
    pub async fn delete_bill(
        &self,
        organization_id: Uuid,
        bill_id: Uuid,
    ) -> Result<(), BillingError> {
        let txn = self.db.begin().await?;

        let bill = lock_bill(&txn, organization_id, bill_id).await?;

        let has_payments = payments::Entity::find()
            .filter(payments::Column::BillId.eq(bill_id))
            .one(&txn)
            .await?
            .is_some();
        if has_payments {
            return Err(BillingError::HasPayments);
        }

        journal::delete_auto_entries(&txn, organization_id, enums::EntrySource::Billing, bill_id)
            .await?;
        bills::Entity::delete_by_id(bill.id).exec(&txn).await?;

        txn.commit().await?;

        Ok(())
    }

    // ---- payments ----

    /// Applies a payment against a bill.
    ///
    /// Inserts the payment, its shadow treasury transaction and the
    /// balance adjustment, and recomputes the bill status, all in one
    /// database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails (overpayment, currency
    /// mismatch), the accounts are missing, or the database operation
    /// fails.
    pub async fn create_payment(
        &self,
        organization_id: Uuid,
        bill_id: Uuid,
        input: CreatePaymentInput,
    ) -> Result<payments::Model, BillingError> {
        let txn = self.db.begin().await?;

        let bill = lock_bill(&txn, organization_id, bill_id).await?;

        let account = load_active_account(&txn, organization_id, input.treasury_account_id).await?;
        if account.currency != bill.currency {
            return Err(CoreBillingError::CurrencyMismatch {
                payment: account.currency,
                bill: bill.currency,
            }
            .into());
        }

        let paid = paid_total(&txn, bill_id, None).await?;
        validate_payment(bill.total, paid, input.amount)?;

        let kind: BillKind = bill.kind.into();
        let now = chrono::Utc::now().into();
        let payment_id = Uuid::new_v4();

        let payment = payments::ActiveModel {
            id: Set(payment_id),
            organization_id: Set(organization_id),
            bill_id: Set(bill_id),
            treasury_account_id: Set(input.treasury_account_id),
            amount: Set(input.amount),
            currency: Set(bill.currency.clone()),
            payment_date: Set(input.payment_date),
            note: Set(input.note),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let payment = payment.insert(&txn).await?;

        let direction = payment_direction(kind);
        let reference = reference_for(kind, payment_id);
        let transaction = treasury_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            treasury_account_id: Set(input.treasury_account_id),
            direction: Set(direction.into()),
            amount: Set(input.amount),
            currency: Set(bill.currency.clone()),
            transaction_date: Set(input.payment_date),
            description: Set(payment_description(kind, &bill.counterparty)),
            category_account_id: Set(None),
            reference: Set(Some(reference.to_string())),
            transfer_group_id: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        transaction.insert(&txn).await?;

        let footprint = BalanceFootprint {
            treasury_account_id: input.treasury_account_id,
            currency: parse_currency(&bill.currency)?,
            direction,
            amount: input.amount,
        };
        apply_balance_changes(&txn, organization_id, &changes_for_create(&footprint)).await?;

        set_bill_status(&txn, &bill, derive_status(bill.total, paid + input.amount)).await?;

        post_payment_entry(&txn, organization_id, &bill, &payment, account.ledger_account_id)
            .await?;

        txn.commit().await?;

        tracing::debug!(payment_id = %payment.id, bill_id = %bill_id, "Payment applied");

        Ok(payment)
    }

    /// Lists payments against a bill, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_payments(
        &self,
        organization_id: Uuid,
        bill_id: Uuid,
    ) -> Result<Vec<payments::Model>, DbErr> {
        payments::Entity::find()
            .filter(payments::Column::OrganizationId.eq(organization_id))
            .filter(payments::Column::BillId.eq(bill_id))
            .order_by_asc(payments::Column::PaymentDate)
            .order_by_asc(payments::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Updates a payment, reverting and reapplying its balance
    /// contribution and keeping the shadow transaction in step.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the payment or its linked
    /// transaction is missing, or the database operation fails.
    pub async fn update_payment(
        &self,
        organization_id: Uuid,
        payment_id: Uuid,
        input: UpdatePaymentInput,
    ) -> Result<payments::Model, BillingError> {
        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(payment_id)
            .filter(payments::Column::OrganizationId.eq(organization_id))
            .one(&txn)
            .await?
            .ok_or(BillingError::PaymentNotFound(payment_id))?;

        let bill = lock_bill(&txn, organization_id, payment.bill_id).await?;

        let kind: BillKind = bill.kind.into();
        let new_account_id = input
            .treasury_account_id
            .unwrap_or(payment.treasury_account_id);
        let account = load_active_account(&txn, organization_id, new_account_id).await?;
        if account.currency != bill.currency {
            return Err(CoreBillingError::CurrencyMismatch {
                payment: account.currency,
                bill: bill.currency,
            }
            .into());
        }

        let new_amount = input.amount.unwrap_or(payment.amount);
        let others = paid_total(&txn, payment.bill_id, Some(payment_id)).await?;
        validate_payment(bill.total, others, new_amount)?;

        let direction = payment_direction(kind);
        let currency = parse_currency(&bill.currency)?;
        let old_footprint = BalanceFootprint {
            treasury_account_id: payment.treasury_account_id,
            currency,
            direction,
            amount: payment.amount,
        };
        let new_footprint = BalanceFootprint {
            treasury_account_id: new_account_id,
            currency,
            direction,
            amount: new_amount,
        };

        let reference = reference_for(kind, payment_id);
        let linked = find_linked_transaction(&txn, organization_id, &reference.to_string())
            .await?
            .ok_or(BillingError::LinkedTransactionMissing(payment_id))?;

        let new_date = input.payment_date.unwrap_or(payment.payment_date);

        let mut active: payments::ActiveModel = payment.into();
        active.treasury_account_id = Set(new_account_id);
        active.amount = Set(new_amount);
        active.payment_date = Set(new_date);
        if let Some(note) = input.note {
            active.note = Set(note);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let payment = active.update(&txn).await?;

        let mut linked: treasury_transactions::ActiveModel = linked.into();
        linked.treasury_account_id = Set(new_account_id);
        linked.amount = Set(new_amount);
        linked.transaction_date = Set(new_date);
        linked.updated_at = Set(chrono::Utc::now().into());
        linked.update(&txn).await?;

        apply_balance_changes(
            &txn,
            organization_id,
            &changes_for_update(&old_footprint, &new_footprint),
        )
        .await?;

        set_bill_status(&txn, &bill, derive_status(bill.total, others + new_amount)).await?;

        journal::delete_auto_entries(
            &txn,
            organization_id,
            enums::EntrySource::Billing,
            payment_id,
        )
        .await?;
        post_payment_entry(&txn, organization_id, &bill, &payment, account.ledger_account_id)
            .await?;

        txn.commit().await?;

        Ok(payment)
    }

    /// Deletes a payment, its shadow transaction and its balance
    /// contribution, and recomputes the bill status.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment or its linked transaction is
    /// missing, or the database operation fails.
    pub async fn delete_payment(
        &self,
        organization_id: Uuid,
        payment_id: Uuid,
    ) -> Result<(), BillingError> {
        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(payment_id)
            .filter(payments::Column::OrganizationId.eq(organization_id))
            .one(&txn)
            .await?
            .ok_or(BillingError::PaymentNotFound(payment_id))?;

        let bill = lock_bill(&txn, organization_id, payment.bill_id).await?;

        let kind: BillKind = bill.kind.into();
        let footprint = BalanceFootprint {
            treasury_account_id: payment.treasury_account_id,
            currency: parse_currency(&payment.currency)?,
            direction: payment_direction(kind),
            amount: payment.amount,
        };
        apply_balance_changes(&txn, organization_id, &changes_for_delete(&footprint)).await?;

        let reference = reference_for(kind, payment_id);
        if let Some(linked) =
            find_linked_transaction(&txn, organization_id, &reference.to_string()).await?
        {
            treasury_transactions::Entity::delete_by_id(linked.id)
                .exec(&txn)
                .await?;
        }

        journal::delete_auto_entries(
            &txn,
            organization_id,
            enums::EntrySource::Billing,
            payment_id,
        )
        .await?;

        payments::Entity::delete_by_id(payment.id).exec(&txn).await?;

        let remaining = paid_total(&txn, bill.id, None).await?;
        set_bill_status(&txn, &bill, derive_status(bill.total, remaining)).await?;

        txn.commit().await?;

        Ok(())
    }
}

/// Loads a bill with a `FOR UPDATE` row lock.
///
/// Payment mutations read `paid_total` and then write, so concurrent
/// payments against the same bill must serialize on the bill row or an
/// overpayment can slip past validation.
async fn lock_bill(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    bill_id: Uuid,
) -> Result<bills::Model, BillingError> {
    bills::Entity::find_by_id(bill_id)
        .filter(bills::Column::OrganizationId.eq(organization_id))
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(BillingError::BillNotFound(bill_id))
}

/// Sum of live payments against a bill, optionally excluding one.
async fn paid_total(
    txn: &DatabaseTransaction,
    bill_id: Uuid,
    exclude: Option<Uuid>,
) -> Result<Decimal, DbErr> {
    let mut query = payments::Entity::find().filter(payments::Column::BillId.eq(bill_id));
    if let Some(id) = exclude {
        query = query.filter(payments::Column::Id.ne(id));
    }
    let rows = query.all(txn).await?;
    Ok(rows.iter().map(|p| p.amount).sum())
}

async fn set_bill_status(
    txn: &DatabaseTransaction,
    bill: &bills::Model,
    status: obralis_core::billing::BillStatus,
) -> Result<(), DbErr> {
    let status: enums::BillStatus = status.into();
    if bill.status == status {
        return Ok(());
    }
    let mut active: bills::ActiveModel = bill.clone().into();
    active.status = Set(status);
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(txn).await?;
    Ok(())
}

async fn find_linked_transaction(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    reference: &str,
) -> Result<Option<treasury_transactions::Model>, DbErr> {
    treasury_transactions::Entity::find()
        .filter(treasury_transactions::Column::OrganizationId.eq(organization_id))
        .filter(treasury_transactions::Column::Reference.eq(reference))
        .one(txn)
        .await
}

const fn payment_direction(kind: BillKind) -> Direction {
    match kind {
        BillKind::Client => Direction::Income,
        BillKind::Provider => Direction::Expense,
    }
}

const fn reference_for(kind: BillKind, payment_id: Uuid) -> PaymentReference {
    match kind {
        BillKind::Client => PaymentReference::Collection(payment_id),
        BillKind::Provider => PaymentReference::BillPayment(payment_id),
    }
}

fn payment_description(kind: BillKind, counterparty: &str) -> String {
    match kind {
        BillKind::Client => format!("Collection from {counterparty}"),
        BillKind::Provider => format!("Payment to {counterparty}"),
    }
}

/// Posts the registration entry for a bill when accounting is
/// configured: receivables against revenue for client bills, expense
/// against payables for provider bills.
async fn post_bill_entry(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    bill: &bills::Model,
) -> Result<(), BillingError> {
    let organization = load_organization(txn, organization_id)
        .await
        .map_err(TreasuryError::from)?;
    if !organization.accounting_enabled {
        return Ok(());
    }
    let kind: BillKind = bill.kind.into();
    let contact_account = contact_account_for(&organization, kind);
    let (Some(contact_account), Some(category_account)) =
        (contact_account, bill.category_account_id)
    else {
        return Ok(());
    };

    let entry = auto_entry_for_bill(
        bill.issue_date,
        bill.description.clone(),
        kind,
        contact_account,
        category_account,
        bill.total,
    );
    journal::insert_entry(
        txn,
        organization_id,
        enums::EntrySource::Billing,
        Some(bill.id),
        &entry,
        bill.created_by,
    )
    .await?;

    Ok(())
}

/// Posts the settlement entry for a payment when accounting is
/// configured: treasury against receivables for collections, payables
/// against treasury for provider payments.
async fn post_payment_entry(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    bill: &bills::Model,
    payment: &payments::Model,
    treasury_ledger_account: Option<Uuid>,
) -> Result<(), BillingError> {
    let organization = load_organization(txn, organization_id)
        .await
        .map_err(TreasuryError::from)?;
    if !organization.accounting_enabled {
        return Ok(());
    }
    let kind: BillKind = bill.kind.into();
    let contact_account = contact_account_for(&organization, kind);
    let (Some(treasury_account), Some(contact_account)) =
        (treasury_ledger_account, contact_account)
    else {
        return Ok(());
    };

    let entry = auto_entry_for_payment(
        payment.payment_date,
        payment_description(kind, &bill.counterparty),
        kind,
        treasury_account,
        contact_account,
        payment.amount,
    );
    journal::insert_entry(
        txn,
        organization_id,
        enums::EntrySource::Billing,
        Some(payment.id),
        &entry,
        payment.created_by,
    )
    .await?;

    Ok(())
}

const fn contact_account_for(
    organization: &organizations::Model,
    kind: BillKind,
) -> Option<Uuid> {
    match kind {
        BillKind::Client => organization.receivable_account_id,
        BillKind::Provider => organization.payable_account_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_direction_follows_bill_kind() {
        assert_eq!(payment_direction(BillKind::Client), Direction::Income);
        assert_eq!(payment_direction(BillKind::Provider), Direction::Expense);
    }

    #[test]
    fn test_reference_kind_matches_bill_kind() {
        let id = Uuid::new_v4();
        assert_eq!(
            reference_for(BillKind::Client, id).to_string(),
            format!("COLL-{id}")
        );
        assert_eq!(
            reference_for(BillKind::Provider, id).to_string(),
            format!("BILL-{id}")
        );
    }

    #[test]
    fn test_payment_description() {
        assert_eq!(
            payment_description(BillKind::Client, "Acme"),
            "Collection from Acme"
        );
        assert_eq!(
            payment_description(BillKind::Provider, "Acme"),
            "Payment to Acme"
        );
    }
}
