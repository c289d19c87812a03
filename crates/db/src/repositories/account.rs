//! Chart of accounts repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{chart_accounts, journal_lines, sea_orm_active_enums::AccountType};

/// Error types for chart of accounts operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Code already in use within the organization.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Parent account not found in the organization.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Parent has a different account type.
    #[error("Parent account type does not match")]
    ParentTypeMismatch,

    /// Account still has child accounts.
    #[error("Account has child accounts")]
    HasChildren,

    /// Account has journal lines posted to it.
    #[error("Account has journal lines")]
    HasLines,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Owning organization.
    pub organization_id: Uuid,
    /// Optional parent in the account tree.
    pub parent_id: Option<Uuid>,
    /// Account code, unique within the organization.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
}

/// Chart of accounts repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account, validating code uniqueness and the parent.
    ///
    /// A child must share its parent's account type so subtree totals
    /// stay meaningful.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate code, bad parent, or database failure.
    pub async fn create(
        &self,
        input: CreateAccountInput,
    ) -> Result<chart_accounts::Model, AccountError> {
        let duplicate = chart_accounts::Entity::find()
            .filter(chart_accounts::Column::OrganizationId.eq(input.organization_id))
            .filter(chart_accounts::Column::Code.eq(input.code.clone()))
            .count(&self.db)
            .await?;
        if duplicate > 0 {
            return Err(AccountError::DuplicateCode(input.code));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = chart_accounts::Entity::find_by_id(parent_id)
                .filter(chart_accounts::Column::OrganizationId.eq(input.organization_id))
                .one(&self.db)
                .await?
                .ok_or(AccountError::ParentNotFound(parent_id))?;

            if parent.account_type != input.account_type {
                return Err(AccountError::ParentTypeMismatch);
            }
        }

        let now = chrono::Utc::now().into();
        let account = chart_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(input.organization_id),
            parent_id: Set(input.parent_id),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Finds an account by ID within an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        org_id: Uuid,
        id: Uuid,
    ) -> Result<Option<chart_accounts::Model>, DbErr> {
        chart_accounts::Entity::find_by_id(id)
            .filter(chart_accounts::Column::OrganizationId.eq(org_id))
            .one(&self.db)
            .await
    }

    /// Lists an organization's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        org_id: Uuid,
        account_type: Option<AccountType>,
        include_inactive: bool,
    ) -> Result<Vec<chart_accounts::Model>, DbErr> {
        let mut query = chart_accounts::Entity::find()
            .filter(chart_accounts::Column::OrganizationId.eq(org_id));

        if let Some(t) = account_type {
            query = query.filter(chart_accounts::Column::AccountType.eq(t));
        }
        if !include_inactive {
            query = query.filter(chart_accounts::Column::IsActive.eq(true));
        }

        query
            .order_by_asc(chart_accounts::Column::Code)
            .all(&self.db)
            .await
    }

    /// Renames an account or toggles its active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the update fails.
    pub async fn update(
        &self,
        org_id: Uuid,
        id: Uuid,
        name: Option<String>,
        is_active: Option<bool>,
    ) -> Result<chart_accounts::Model, AccountError> {
        let account = self
            .find_by_id(org_id, id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let mut active: chart_accounts::ActiveModel = account.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(flag) = is_active {
            active.is_active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account with no children and no journal lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is referenced or the delete fails.
    pub async fn delete(&self, org_id: Uuid, id: Uuid) -> Result<(), AccountError> {
        let account = self
            .find_by_id(org_id, id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let children = chart_accounts::Entity::find()
            .filter(chart_accounts::Column::ParentId.eq(id))
            .count(&self.db)
            .await?;
        if children > 0 {
            return Err(AccountError::HasChildren);
        }

        let lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(id))
            .count(&self.db)
            .await?;
        if lines > 0 {
            return Err(AccountError::HasLines);
        }

        chart_accounts::Entity::delete_by_id(account.id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}
