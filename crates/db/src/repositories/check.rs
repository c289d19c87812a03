//! Check repository: issued and received checks and their lifecycle.
//!
//! Checks only touch treasury balances when they settle (cashed for
//! issued checks, credited for received ones). A settling transition
//! writes the treasury transaction, the balance adjustment and the
//! settlement link in one database transaction.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use obralis_core::balance::{BalanceFootprint, Direction, changes_for_create};
use obralis_core::treasury::{
    self, CheckError as CoreCheckError, CheckKind, CheckStatus, check::validate_transition,
};

use crate::entities::{checks, sea_orm_active_enums as enums, treasury_transactions};
use crate::repositories::treasury::{
    TreasuryError, apply_balance_changes, load_active_account, parse_currency,
};

/// Error types for check operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// Check not found.
    #[error("Check not found: {0}")]
    NotFound(Uuid),

    /// Settling requires a treasury account.
    #[error("Check {0} has no treasury account to settle against")]
    MissingTreasuryAccount(Uuid),

    /// Settling requires a settlement date.
    #[error("Settling transition requires a settlement date")]
    MissingSettlementDate,

    /// Check and treasury account currencies differ.
    #[error("Check currency {check} does not match account currency {account}")]
    CurrencyMismatch {
        /// Currency of the check.
        check: String,
        /// Currency of the settlement account.
        account: String,
    },

    /// Settled checks are immutable.
    #[error("Check {0} has settled and cannot be changed")]
    AlreadySettled(Uuid),

    /// Lifecycle rule violation.
    #[error(transparent)]
    Lifecycle(#[from] CoreCheckError),

    /// Amount validation failed.
    #[error(transparent)]
    Validation(#[from] treasury::TreasuryError),

    /// Treasury-side failure.
    #[error(transparent)]
    Treasury(#[from] TreasuryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a check.
#[derive(Debug, Clone)]
pub struct CreateCheckInput {
    /// Issued by the organization or received from a third party.
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
    /// Recording user.
    pub created_by: Option<Uuid>,
}

/// Input for moving a check through its lifecycle.
#[derive(Debug, Clone)]
pub struct TransitionInput {
    /// Target status.
    pub to: CheckStatus,
    /// Date funds moved; required for settling transitions.
    pub settlement_date: Option<NaiveDate>,
    /// Settlement account, overriding the one stored on the check.
    pub treasury_account_id: Option<Uuid>,
}

/// Check repository for CRUD and lifecycle transitions.
#[derive(Debug, Clone)]
pub struct CheckRepository {
    db: DatabaseConnection,
}

impl CheckRepository {
    /// Creates a new check repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a check at the initial status for its kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive or the insert
    /// fails.
    pub async fn create(
        &self,
        organization_id: Uuid,
        input: CreateCheckInput,
    ) -> Result<checks::Model, CheckError> {
        treasury::validate_amount(input.amount)?;

        let now = chrono::Utc::now().into();
        let model = checks::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            kind: Set(kind_to_db(input.kind)),
            status: Set(CheckStatus::initial(input.kind).into()),
            number: Set(input.number),
            counterparty: Set(input.counterparty),
            amount: Set(input.amount),
            currency: Set(input.currency),
            issue_date: Set(input.issue_date),
            due_date: Set(input.due_date),
            treasury_account_id: Set(input.treasury_account_id),
            settlement_transaction_id: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Gets a check by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the check is missing or the query fails.
    pub async fn get(
        &self,
        organization_id: Uuid,
        check_id: Uuid,
    ) -> Result<checks::Model, CheckError> {
        checks::Entity::find_by_id(check_id)
            .filter(checks::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(CheckError::NotFound(check_id))
    }

    /// Lists checks, newest first, optionally filtered by kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        organization_id: Uuid,
        kind: Option<CheckKind>,
    ) -> Result<Vec<checks::Model>, DbErr> {
        let mut query =
            checks::Entity::find().filter(checks::Column::OrganizationId.eq(organization_id));
        if let Some(kind) = kind {
            query = query.filter(checks::Column::Kind.eq(kind_to_db(kind)));
        }
        query
            .order_by_desc(checks::Column::IssueDate)
            .order_by_desc(checks::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Moves a check to a new lifecycle status.
    ///
    /// Settling transitions (issued → cashed, received → credited)
    /// write a treasury transaction and adjust the stored balance in
    /// the same database transaction as the status change.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not part of the
    /// lifecycle, a settling transition lacks an account or date, or
    /// the database operation fails.
    pub async fn transition(
        &self,
        organization_id: Uuid,
        check_id: Uuid,
        input: TransitionInput,
    ) -> Result<checks::Model, CheckError> {
        let txn = self.db.begin().await?;

        let check = checks::Entity::find_by_id(check_id)
            .filter(checks::Column::OrganizationId.eq(organization_id))
            .one(&txn)
            .await?
            .ok_or(CheckError::NotFound(check_id))?;

        let kind: CheckKind = check.kind.into();
        let from: CheckStatus = check.status.into();
        validate_transition(kind, from, input.to)?;

        let mut settlement_transaction_id = None;
        let treasury_account_id = input.treasury_account_id.or(check.treasury_account_id);

        if input.to.settles_funds() {
            let account_id = treasury_account_id
                .ok_or(CheckError::MissingTreasuryAccount(check_id))?;
            let settlement_date = input
                .settlement_date
                .ok_or(CheckError::MissingSettlementDate)?;

            let account = load_active_account(&txn, organization_id, account_id).await?;
            if account.currency != check.currency {
                return Err(CheckError::CurrencyMismatch {
                    check: check.currency,
                    account: account.currency,
                });
            }

            let direction = settlement_direction(kind);
            let now = chrono::Utc::now().into();
            let transaction = treasury_transactions::ActiveModel {
                id: Set(Uuid::new_v4()),
                organization_id: Set(organization_id),
                treasury_account_id: Set(account_id),
                direction: Set(direction.into()),
                amount: Set(check.amount),
                currency: Set(check.currency.clone()),
                transaction_date: Set(settlement_date),
                description: Set(settlement_description(kind, &check.number)),
                category_account_id: Set(None),
                reference: Set(None),
                transfer_group_id: Set(None),
                created_by: Set(check.created_by),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let transaction = transaction.insert(&txn).await?;

            let footprint = BalanceFootprint {
                treasury_account_id: account_id,
                currency: parse_currency(&check.currency)?,
                direction,
                amount: check.amount,
            };
            apply_balance_changes(&txn, organization_id, &changes_for_create(&footprint)).await?;

            settlement_transaction_id = Some(transaction.id);
        }

        let mut active: checks::ActiveModel = check.into();
        active.status = Set(input.to.into());
        active.treasury_account_id = Set(treasury_account_id);
        if settlement_transaction_id.is_some() {
            active.settlement_transaction_id = Set(settlement_transaction_id);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let model = active.update(&txn).await?;

        txn.commit().await?;

        tracing::debug!(check_id = %model.id, status = ?model.status, "Check transitioned");

        Ok(model)
    }

    /// Deletes a check that has not settled.
    ///
    /// # Errors
    ///
    /// Returns an error if the check is missing, has settled, or the
    /// delete fails.
    pub async fn delete(
        &self,
        organization_id: Uuid,
        check_id: Uuid,
    ) -> Result<(), CheckError> {
        let check = self.get(organization_id, check_id).await?;

        if check.settlement_transaction_id.is_some() {
            return Err(CheckError::AlreadySettled(check_id));
        }

        checks::Entity::delete_by_id(check.id).exec(&self.db).await?;

        Ok(())
    }
}

/// Direction of the settlement transaction: issued checks drain the
/// account, received checks fill it.
const fn settlement_direction(kind: CheckKind) -> Direction {
    match kind {
        CheckKind::Issued => Direction::Expense,
        CheckKind::Received => Direction::Income,
    }
}

const fn kind_to_db(kind: CheckKind) -> enums::CheckKind {
    match kind {
        CheckKind::Issued => enums::CheckKind::Issued,
        CheckKind::Received => enums::CheckKind::Received,
    }
}

fn settlement_description(kind: CheckKind, number: &str) -> String {
    match kind {
        CheckKind::Issued => format!("Check {number} cashed"),
        CheckKind::Received => format!("Check {number} credited"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settlement_direction() {
        assert_eq!(settlement_direction(CheckKind::Issued), Direction::Expense);
        assert_eq!(settlement_direction(CheckKind::Received), Direction::Income);
    }

    #[test]
    fn test_settlement_description() {
        assert_eq!(
            settlement_description(CheckKind::Issued, "0001"),
            "Check 0001 cashed"
        );
        assert_eq!(
            settlement_description(CheckKind::Received, "0002"),
            "Check 0002 credited"
        );
    }
}
