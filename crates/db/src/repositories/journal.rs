//! Journal entry repository.
//!
//! Manual entries come in through the API; auto entries are written by
//! the treasury and billing repositories inside their own database
//! transactions, tagged with the source record's id so they can be
//! replaced or removed when the source changes.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use obralis_core::ledger::{JournalValidationError, NewJournalEntry, validate_journal_lines};

use crate::entities::{
    chart_accounts, journal_entries, journal_lines,
    sea_orm_active_enums::{EntrySource, JournalSide},
};

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    NotFound(Uuid),

    /// A line references a missing account.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// A line references an inactive account.
    #[error("Account is inactive: {0}")]
    AccountInactive(Uuid),

    /// A line references a header account. Only leaf accounts take
    /// postings; headers exist to group their children in reports.
    #[error("Account {0} has child accounts and cannot take postings")]
    AccountNotPostable(Uuid),

    /// Entry validation failed.
    #[error(transparent)]
    Validation(#[from] JournalValidationError),

    /// Auto-generated entries follow their source record.
    #[error("Only manual journal entries can be modified directly")]
    NotManual,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Journal entry with its lines.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Lines, in insertion order.
    pub lines: Vec<journal_lines::Model>,
}

/// Journal repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a manual journal entry.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, an account is missing or
    /// inactive, or the database operation fails.
    pub async fn create_manual(
        &self,
        organization_id: Uuid,
        input: NewJournalEntry,
        created_by: Uuid,
    ) -> Result<EntryWithLines, JournalError> {
        let txn = self.db.begin().await?;

        let result = insert_entry(
            &txn,
            organization_id,
            EntrySource::Manual,
            None,
            &input,
            Some(created_by),
        )
        .await?;

        txn.commit().await?;

        Ok(result)
    }

    /// Gets an entry by ID with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is not found or the query fails.
    pub async fn get(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
    ) -> Result<EntryWithLines, JournalError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(JournalError::NotFound(entry_id))?;

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::EntryId.eq(entry_id))
            .order_by_asc(journal_lines::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(EntryWithLines { entry, lines })
    }

    /// Lists entries for an organization, newest first, optionally
    /// bounded by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        organization_id: Uuid,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<journal_entries::Model>, DbErr> {
        let mut query = journal_entries::Entity::find()
            .filter(journal_entries::Column::OrganizationId.eq(organization_id));

        if let Some(from) = date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }

        query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Deletes a manual journal entry and its lines.
    ///
    /// Auto entries are refused; they follow their source record.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing, auto-generated, or
    /// the delete fails.
    pub async fn delete_manual(
        &self,
        organization_id: Uuid,
        entry_id: Uuid,
    ) -> Result<(), JournalError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .filter(journal_entries::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(JournalError::NotFound(entry_id))?;

        if entry.source != EntrySource::Manual {
            return Err(JournalError::NotManual);
        }

        // Lines cascade.
        journal_entries::Entity::delete_by_id(entry_id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

/// Validates and inserts a journal entry inside an open transaction.
///
/// Shared by the manual path and the treasury/billing auto-posting
/// paths so every entry gets the same validation.
pub(crate) async fn insert_entry(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    source: EntrySource,
    source_id: Option<Uuid>,
    input: &NewJournalEntry,
    created_by: Option<Uuid>,
) -> Result<EntryWithLines, JournalError> {
    validate_journal_lines(&input.lines)?;

    for line in &input.lines {
        let account = chart_accounts::Entity::find_by_id(line.account_id)
            .filter(chart_accounts::Column::OrganizationId.eq(organization_id))
            .one(txn)
            .await?
            .ok_or(JournalError::AccountNotFound(line.account_id))?;

        if !account.is_active {
            return Err(JournalError::AccountInactive(line.account_id));
        }

        let children = chart_accounts::Entity::find()
            .filter(chart_accounts::Column::ParentId.eq(line.account_id))
            .count(txn)
            .await?;
        if children > 0 {
            return Err(JournalError::AccountNotPostable(line.account_id));
        }
    }

    let now = chrono::Utc::now().into();
    let entry_id = Uuid::new_v4();

    let entry = journal_entries::ActiveModel {
        id: Set(entry_id),
        organization_id: Set(organization_id),
        entry_date: Set(input.entry_date),
        description: Set(input.description.clone()),
        source: Set(source),
        source_id: Set(source_id),
        created_by: Set(created_by),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let entry = entry.insert(txn).await?;

    let mut lines = Vec::with_capacity(input.lines.len());
    for line in &input.lines {
        let model = journal_lines::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_id: Set(entry_id),
            account_id: Set(line.account_id),
            side: Set(JournalSide::from(line.side)),
            amount: Set(line.amount),
            memo: Set(line.memo.clone()),
            created_at: Set(now),
        };
        lines.push(model.insert(txn).await?);
    }

    Ok(EntryWithLines { entry, lines })
}

/// Deletes the auto entries generated from a source record.
pub(crate) async fn delete_auto_entries<C: ConnectionTrait>(
    conn: &C,
    organization_id: Uuid,
    source: EntrySource,
    source_id: Uuid,
) -> Result<u64, DbErr> {
    let result = journal_entries::Entity::delete_many()
        .filter(journal_entries::Column::OrganizationId.eq(organization_id))
        .filter(journal_entries::Column::Source.eq(source))
        .filter(journal_entries::Column::SourceId.eq(source_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}
