//! Treasury repository: cash boxes, bank accounts, transactions and
//! the denormalized balances they maintain.
//!
//! Every mutation of a transaction commits its row change and its
//! balance-row adjustments in one database transaction, so the stored
//! balance always equals the signed sum of live transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use std::str::FromStr;
use uuid::Uuid;

use obralis_core::balance::{
    BalanceChange, BalanceFootprint, Direction, changes_for_create, changes_for_delete,
    changes_for_update,
};
use obralis_core::ledger::auto_entry_for_transaction;
use obralis_core::treasury::{self, TreasuryError as CoreTreasuryError};
use obralis_shared::types::{Currency, PageRequest, PageResponse};

use crate::entities::{
    account_balances, organizations, sea_orm_active_enums as enums, treasury_accounts,
    treasury_transactions,
};
use crate::repositories::journal::{self, JournalError};

/// Error types for treasury operations.
#[derive(Debug, thiserror::Error)]
pub enum TreasuryError {
    /// Treasury account not found.
    #[error("Treasury account not found: {0}")]
    AccountNotFound(Uuid),

    /// Treasury account is inactive.
    #[error("Treasury account is inactive: {0}")]
    AccountInactive(Uuid),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Payment-linked transactions are managed through the billing
    /// repository.
    #[error("Transaction {0} belongs to a payment and cannot be modified directly")]
    PaymentLinked(Uuid),

    /// Transfer legs are updated or deleted as a pair.
    #[error("Transaction {0} is a transfer leg; delete the transfer instead")]
    TransferLeg(Uuid),

    /// A stored currency code failed to parse.
    #[error("Invalid currency stored: {0}")]
    InvalidCurrency(String),

    /// Domain validation failed.
    #[error(transparent)]
    Validation(#[from] CoreTreasuryError),

    /// Auto-posting failed.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a treasury account.
#[derive(Debug, Clone)]
pub struct CreateTreasuryAccountInput {
    /// Display name.
    pub name: String,
    /// Cash box or bank account.
    pub kind: enums::TreasuryAccountKind,
    /// Account currency.
    pub currency: Currency,
    /// Ledger account for auto-posting, if accounting is used.
    pub ledger_account_id: Option<Uuid>,
}

/// Input for recording a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// The treasury account money moves through.
    pub treasury_account_id: Uuid,
    /// Income or expense.
    pub direction: Direction,
    /// Positive amount.
    pub amount: Decimal,
    /// Date the movement happened.
    pub transaction_date: NaiveDate,
    /// Free-form description.
    pub description: String,
    /// Category ledger account for auto-posting.
    pub category_account_id: Option<Uuid>,
    /// Recording user.
    pub created_by: Option<Uuid>,
}

/// Fields that can change on an existing transaction.
///
/// `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    /// Move the transaction to another treasury account.
    pub treasury_account_id: Option<Uuid>,
    /// Flip or keep the direction.
    pub direction: Option<Direction>,
    /// New positive amount.
    pub amount: Option<Decimal>,
    /// New date.
    pub transaction_date: Option<NaiveDate>,
    /// New description.
    pub description: Option<String>,
    /// Replace the category account (`Some(None)` clears it).
    pub category_account_id: Option<Option<Uuid>>,
}

/// Input for a transfer between two treasury accounts.
#[derive(Debug, Clone)]
pub struct TransferInput {
    /// Source account (expense leg).
    pub from_account_id: Uuid,
    /// Destination account (income leg).
    pub to_account_id: Uuid,
    /// Positive amount moved.
    pub amount: Decimal,
    /// Date of the transfer.
    pub transaction_date: NaiveDate,
    /// Free-form description.
    pub description: String,
    /// Recording user.
    pub created_by: Option<Uuid>,
}

/// Filters for listing transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Restrict to one treasury account.
    pub treasury_account_id: Option<Uuid>,
    /// Restrict to one direction.
    pub direction: Option<Direction>,
    /// Inclusive lower date bound.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub date_to: Option<NaiveDate>,
}

/// Treasury repository for accounts, transactions and balances.
#[derive(Debug, Clone)]
pub struct TreasuryRepository {
    db: DatabaseConnection,
}

impl TreasuryRepository {
    /// Creates a new treasury repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ---- treasury accounts ----

    /// Creates a cash box or bank account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_account(
        &self,
        organization_id: Uuid,
        input: CreateTreasuryAccountInput,
    ) -> Result<treasury_accounts::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let account = treasury_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            name: Set(input.name),
            kind: Set(input.kind),
            currency: Set(input.currency.to_string()),
            ledger_account_id: Set(input.ledger_account_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        account.insert(&self.db).await
    }

    /// Gets a treasury account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the query fails.
    pub async fn get_account(
        &self,
        organization_id: Uuid,
        account_id: Uuid,
    ) -> Result<treasury_accounts::Model, TreasuryError> {
        treasury_accounts::Entity::find_by_id(account_id)
            .filter(treasury_accounts::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(TreasuryError::AccountNotFound(account_id))
    }

    /// Lists treasury accounts for an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_accounts(
        &self,
        organization_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<treasury_accounts::Model>, DbErr> {
        let mut query = treasury_accounts::Entity::find()
            .filter(treasury_accounts::Column::OrganizationId.eq(organization_id));
        if !include_inactive {
            query = query.filter(treasury_accounts::Column::IsActive.eq(true));
        }
        query
            .order_by_asc(treasury_accounts::Column::Name)
            .all(&self.db)
            .await
    }

    /// Updates a treasury account's name, ledger account or active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the update fails.
    pub async fn update_account(
        &self,
        organization_id: Uuid,
        account_id: Uuid,
        name: Option<String>,
        ledger_account_id: Option<Option<Uuid>>,
        is_active: Option<bool>,
    ) -> Result<treasury_accounts::Model, TreasuryError> {
        let account = self.get_account(organization_id, account_id).await?;

        let mut active: treasury_accounts::ActiveModel = account.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(ledger) = ledger_account_id {
            active.ledger_account_id = Set(ledger);
        }
        if let Some(flag) = is_active {
            active.is_active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Lists the stored balance rows for an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn balances(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<account_balances::Model>, DbErr> {
        account_balances::Entity::find()
            .filter(account_balances::Column::OrganizationId.eq(organization_id))
            .order_by_asc(account_balances::Column::TreasuryAccountId)
            .all(&self.db)
            .await
    }

    // ---- transactions ----

    /// Records a transaction and adjusts the stored balance, atomically.
    ///
    /// When the organization has accounting enabled and both the
    /// treasury account and the input carry ledger accounts, a journal
    /// entry is posted in the same database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the account is missing or
    /// inactive, or the database operation fails.
    pub async fn create_transaction(
        &self,
        organization_id: Uuid,
        input: CreateTransactionInput,
    ) -> Result<treasury_transactions::Model, TreasuryError> {
        treasury::validate_amount(input.amount)?;

        let txn = self.db.begin().await?;

        let account = load_active_account(&txn, organization_id, input.treasury_account_id).await?;
        let currency = parse_currency(&account.currency)?;

        let now = chrono::Utc::now().into();
        let id = Uuid::new_v4();
        let model = treasury_transactions::ActiveModel {
            id: Set(id),
            organization_id: Set(organization_id),
            treasury_account_id: Set(input.treasury_account_id),
            direction: Set(input.direction.into()),
            amount: Set(input.amount),
            currency: Set(account.currency.clone()),
            transaction_date: Set(input.transaction_date),
            description: Set(input.description.clone()),
            category_account_id: Set(input.category_account_id),
            reference: Set(None),
            transfer_group_id: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = model.insert(&txn).await?;

        let footprint = BalanceFootprint {
            treasury_account_id: input.treasury_account_id,
            currency,
            direction: input.direction,
            amount: input.amount,
        };
        apply_balance_changes(&txn, organization_id, &changes_for_create(&footprint)).await?;

        post_transaction_entry(&txn, organization_id, &model, &account, input.created_by).await?;

        txn.commit().await?;

        tracing::debug!(
            transaction_id = %model.id,
            account_id = %model.treasury_account_id,
            "Treasury transaction recorded"
        );

        Ok(model)
    }

    /// Gets a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is missing or the query fails.
    pub async fn get_transaction(
        &self,
        organization_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<treasury_transactions::Model, TreasuryError> {
        treasury_transactions::Entity::find_by_id(transaction_id)
            .filter(treasury_transactions::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(TreasuryError::TransactionNotFound(transaction_id))
    }

    /// Lists transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_transactions(
        &self,
        organization_id: Uuid,
        filter: TransactionFilter,
        page: &PageRequest,
    ) -> Result<PageResponse<treasury_transactions::Model>, DbErr> {
        let mut query = treasury_transactions::Entity::find()
            .filter(treasury_transactions::Column::OrganizationId.eq(organization_id));

        if let Some(account_id) = filter.treasury_account_id {
            query =
                query.filter(treasury_transactions::Column::TreasuryAccountId.eq(account_id));
        }
        if let Some(direction) = filter.direction {
            let direction: enums::TransactionDirection = direction.into();
            query = query.filter(treasury_transactions::Column::Direction.eq(direction));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(treasury_transactions::Column::TransactionDate.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(treasury_transactions::Column::TransactionDate.lte(to));
        }

        let paginator = query
            .order_by_desc(treasury_transactions::Column::TransactionDate)
            .order_by_desc(treasury_transactions::Column::CreatedAt)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await?;

        Ok(PageResponse::new(items, page.page, page.per_page, total))
    }

    /// Updates a transaction, reverting the old balance contribution
    /// and applying the new one in the same database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is payment-linked, a
    /// transfer leg, missing, or the database operation fails.
    pub async fn update_transaction(
        &self,
        organization_id: Uuid,
        transaction_id: Uuid,
        input: UpdateTransactionInput,
    ) -> Result<treasury_transactions::Model, TreasuryError> {
        let txn = self.db.begin().await?;

        let existing = treasury_transactions::Entity::find_by_id(transaction_id)
            .filter(treasury_transactions::Column::OrganizationId.eq(organization_id))
            .one(&txn)
            .await?
            .ok_or(TreasuryError::TransactionNotFound(transaction_id))?;

        guard_direct_edit(&existing)?;

        let old_footprint = footprint_of(&existing)?;

        let new_account_id = input
            .treasury_account_id
            .unwrap_or(existing.treasury_account_id);
        let account = load_active_account(&txn, organization_id, new_account_id).await?;
        let currency = parse_currency(&account.currency)?;

        let new_direction = input.direction.unwrap_or(old_footprint.direction);
        let new_amount = input.amount.unwrap_or(existing.amount);
        treasury::validate_amount(new_amount)?;

        let new_footprint = BalanceFootprint {
            treasury_account_id: new_account_id,
            currency,
            direction: new_direction,
            amount: new_amount,
        };

        let mut active: treasury_transactions::ActiveModel = existing.into();
        active.treasury_account_id = Set(new_account_id);
        active.currency = Set(account.currency.clone());
        active.direction = Set(new_direction.into());
        active.amount = Set(new_amount);
        if let Some(date) = input.transaction_date {
            active.transaction_date = Set(date);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(category) = input.category_account_id {
            active.category_account_id = Set(category);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let model = active.update(&txn).await?;

        apply_balance_changes(
            &txn,
            organization_id,
            &changes_for_update(&old_footprint, &new_footprint),
        )
        .await?;

        // Re-post: the old auto entry no longer matches the row.
        journal::delete_auto_entries(&txn, organization_id, enums::EntrySource::Treasury, model.id)
            .await?;
        post_transaction_entry(&txn, organization_id, &model, &account, model.created_by).await?;

        txn.commit().await?;

        Ok(model)
    }

    /// Deletes a transaction and reverts its balance contribution.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction is payment-linked, a
    /// transfer leg, missing, or the database operation fails.
    pub async fn delete_transaction(
        &self,
        organization_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), TreasuryError> {
        let txn = self.db.begin().await?;

        let existing = treasury_transactions::Entity::find_by_id(transaction_id)
            .filter(treasury_transactions::Column::OrganizationId.eq(organization_id))
            .one(&txn)
            .await?
            .ok_or(TreasuryError::TransactionNotFound(transaction_id))?;

        guard_direct_edit(&existing)?;

        let footprint = footprint_of(&existing)?;
        apply_balance_changes(&txn, organization_id, &changes_for_delete(&footprint)).await?;

        journal::delete_auto_entries(
            &txn,
            organization_id,
            enums::EntrySource::Treasury,
            existing.id,
        )
        .await?;

        treasury_transactions::Entity::delete_by_id(existing.id)
            .exec(&txn)
            .await?;

        txn.commit().await?;

        Ok(())
    }

    // ---- transfers ----

    /// Moves money between two treasury accounts.
    ///
    /// Persisted as an expense leg on the source and an income leg on
    /// the destination, sharing a transfer group id. Both legs and both
    /// balance adjustments commit together.
    ///
    /// # Errors
    ///
    /// Returns an error if the accounts mismatch in currency, either is
    /// missing or inactive, or the database operation fails.
    pub async fn transfer(
        &self,
        organization_id: Uuid,
        input: TransferInput,
    ) -> Result<(treasury_transactions::Model, treasury_transactions::Model), TreasuryError> {
        let txn = self.db.begin().await?;

        let from = load_active_account(&txn, organization_id, input.from_account_id).await?;
        let to = load_active_account(&txn, organization_id, input.to_account_id).await?;

        treasury::validate_transfer(
            input.from_account_id,
            input.to_account_id,
            from.currency == to.currency,
            input.amount,
        )?;

        let currency = parse_currency(&from.currency)?;
        let group_id = Uuid::new_v4();
        let now = chrono::Utc::now().into();

        let mut legs = Vec::with_capacity(2);
        for (account, direction) in [(&from, Direction::Expense), (&to, Direction::Income)] {
            let model = treasury_transactions::ActiveModel {
                id: Set(Uuid::new_v4()),
                organization_id: Set(organization_id),
                treasury_account_id: Set(account.id),
                direction: Set(direction.into()),
                amount: Set(input.amount),
                currency: Set(account.currency.clone()),
                transaction_date: Set(input.transaction_date),
                description: Set(input.description.clone()),
                category_account_id: Set(None),
                reference: Set(None),
                transfer_group_id: Set(Some(group_id)),
                created_by: Set(input.created_by),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let model = model.insert(&txn).await?;

            let footprint = BalanceFootprint {
                treasury_account_id: account.id,
                currency,
                direction,
                amount: input.amount,
            };
            apply_balance_changes(&txn, organization_id, &changes_for_create(&footprint)).await?;

            legs.push(model);
        }

        // Internal movement between ledger accounts, when both sides
        // are mapped and accounting is on.
        let organization = load_organization(&txn, organization_id).await?;
        if organization.accounting_enabled {
            if let (Some(to_ledger), Some(from_ledger)) = (to.ledger_account_id, from.ledger_account_id) {
                let entry = auto_entry_for_transaction(
                    input.transaction_date,
                    input.description.clone(),
                    Direction::Income,
                    to_ledger,
                    from_ledger,
                    input.amount,
                );
                journal::insert_entry(
                    &txn,
                    organization_id,
                    enums::EntrySource::Treasury,
                    Some(group_id),
                    &entry,
                    input.created_by,
                )
                .await?;
            }
        }

        txn.commit().await?;

        let income_leg = legs
            .pop()
            .ok_or_else(|| DbErr::Custom("transfer leg missing".into()))?;
        let expense_leg = legs
            .pop()
            .ok_or_else(|| DbErr::Custom("transfer leg missing".into()))?;

        Ok((expense_leg, income_leg))
    }

    /// Deletes both legs of a transfer and reverts both balances.
    ///
    /// # Errors
    ///
    /// Returns an error if no legs exist for the group or the database
    /// operation fails.
    pub async fn delete_transfer(
        &self,
        organization_id: Uuid,
        transfer_group_id: Uuid,
    ) -> Result<(), TreasuryError> {
        let txn = self.db.begin().await?;

        let legs = treasury_transactions::Entity::find()
            .filter(treasury_transactions::Column::OrganizationId.eq(organization_id))
            .filter(treasury_transactions::Column::TransferGroupId.eq(transfer_group_id))
            .all(&txn)
            .await?;

        if legs.is_empty() {
            return Err(TreasuryError::TransactionNotFound(transfer_group_id));
        }

        for leg in &legs {
            let footprint = footprint_of(leg)?;
            apply_balance_changes(&txn, organization_id, &changes_for_delete(&footprint)).await?;
            treasury_transactions::Entity::delete_by_id(leg.id)
                .exec(&txn)
                .await?;
        }

        journal::delete_auto_entries(
            &txn,
            organization_id,
            enums::EntrySource::Treasury,
            transfer_group_id,
        )
        .await?;

        txn.commit().await?;

        Ok(())
    }
}

/// Applies a set of balance deltas inside an open database transaction.
///
/// Each delta is a single `INSERT .. ON CONFLICT DO UPDATE` against the
/// unique (account, currency) row, with the new balance computed in
/// SQL. Concurrent mutations on the same row serialize on the row lock
/// instead of overwriting each other's reads. Shared with the billing
/// and check repositories so every path through the protocol adjusts
/// balances the same way.
pub(crate) async fn apply_balance_changes(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    changes: &[BalanceChange],
) -> Result<(), DbErr> {
    for change in changes {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let row = account_balances::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            treasury_account_id: Set(change.key.treasury_account_id),
            currency: Set(change.key.currency.to_string()),
            balance: Set(change.delta),
            updated_at: Set(now),
        };
        account_balances::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    account_balances::Column::TreasuryAccountId,
                    account_balances::Column::Currency,
                ])
                .value(
                    account_balances::Column::Balance,
                    Expr::col((account_balances::Entity, account_balances::Column::Balance))
                        .add(change.delta),
                )
                .value(account_balances::Column::UpdatedAt, Expr::value(now))
                .to_owned(),
            )
            .exec(txn)
            .await?;
    }

    Ok(())
}

/// Loads an active treasury account inside an open transaction.
pub(crate) async fn load_active_account(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    account_id: Uuid,
) -> Result<treasury_accounts::Model, TreasuryError> {
    let account = treasury_accounts::Entity::find_by_id(account_id)
        .filter(treasury_accounts::Column::OrganizationId.eq(organization_id))
        .one(txn)
        .await?
        .ok_or(TreasuryError::AccountNotFound(account_id))?;

    if !account.is_active {
        return Err(TreasuryError::AccountInactive(account_id));
    }

    Ok(account)
}

pub(crate) async fn load_organization(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
) -> Result<organizations::Model, DbErr> {
    organizations::Entity::find_by_id(organization_id)
        .one(txn)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("organization {organization_id}")))
}

/// The balance-relevant view of a stored transaction row.
pub(crate) fn footprint_of(
    model: &treasury_transactions::Model,
) -> Result<BalanceFootprint, TreasuryError> {
    Ok(BalanceFootprint {
        treasury_account_id: model.treasury_account_id,
        currency: parse_currency(&model.currency)?,
        direction: model.direction.into(),
        amount: model.amount,
    })
}

pub(crate) fn parse_currency(raw: &str) -> Result<Currency, TreasuryError> {
    Currency::from_str(raw).map_err(|_| TreasuryError::InvalidCurrency(raw.to_string()))
}

fn guard_direct_edit(model: &treasury_transactions::Model) -> Result<(), TreasuryError> {
    if model.reference.is_some() {
        return Err(TreasuryError::PaymentLinked(model.id));
    }
    if model.transfer_group_id.is_some() {
        return Err(TreasuryError::TransferLeg(model.id));
    }
    Ok(())
}

/// Posts the auto journal entry for a transaction when the
/// organization and accounts are configured for it.
async fn post_transaction_entry(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    model: &treasury_transactions::Model,
    account: &treasury_accounts::Model,
    created_by: Option<Uuid>,
) -> Result<(), TreasuryError> {
    let organization = load_organization(txn, organization_id).await?;
    if !organization.accounting_enabled {
        return Ok(());
    }
    let (Some(ledger_account), Some(category_account)) =
        (account.ledger_account_id, model.category_account_id)
    else {
        return Ok(());
    };

    let entry = auto_entry_for_transaction(
        model.transaction_date,
        model.description.clone(),
        model.direction.into(),
        ledger_account,
        category_account,
        model.amount,
    );
    journal::insert_entry(
        txn,
        organization_id,
        enums::EntrySource::Treasury,
        Some(model.id),
        &entry,
        created_by,
    )
    .await?;

    Ok(())
}
