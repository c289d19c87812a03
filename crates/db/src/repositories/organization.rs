//! Organization repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{organization_users, organizations, sea_orm_active_enums::UserRole, users};

/// Organization repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

/// Updatable organization settings.
#[derive(Debug, Clone, Default)]
pub struct OrganizationUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New base currency code.
    pub base_currency: Option<String>,
    /// Toggle the accounting module.
    pub accounting_enabled: Option<bool>,
    /// Default receivables ledger account.
    pub receivable_account_id: Option<Option<Uuid>>,
    /// Default payables ledger account.
    pub payable_account_id: Option<Option<Uuid>>,
}

impl OrganizationRepository {
    /// Creates a new organization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an organization by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an organization by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<organizations::Model>, DbErr> {
        organizations::Entity::find()
            .filter(organizations::Column::Slug.eq(slug))
            .one(&self.db)
            .await
    }

    /// Checks if a slug is already taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, DbErr> {
        let count = organizations::Entity::find()
            .filter(organizations::Column::Slug.eq(slug))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Creates a new organization with the creator as owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_with_owner(
        &self,
        name: &str,
        slug: &str,
        base_currency: &str,
        owner_id: Uuid,
    ) -> Result<organizations::Model, DbErr> {
        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();
        let org_id = Uuid::new_v4();

        let org = organizations::ActiveModel {
            id: Set(org_id),
            name: Set(name.to_string()),
            slug: Set(slug.to_string()),
            base_currency: Set(base_currency.to_string()),
            accounting_enabled: Set(false),
            receivable_account_id: Set(None),
            payable_account_id: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let org = org.insert(&txn).await?;

        let org_user = organization_users::ActiveModel {
            user_id: Set(owner_id),
            organization_id: Set(org_id),
            role: Set(UserRole::Owner),
            created_at: Set(now),
            updated_at: Set(now),
        };

        org_user.insert(&txn).await?;

        txn.commit().await?;

        Ok(org)
    }

    /// Updates organization settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn update(
        &self,
        id: Uuid,
        update: OrganizationUpdate,
    ) -> Result<organizations::Model, DbErr> {
        let org = organizations::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("organization {id}")))?;

        let mut active: organizations::ActiveModel = org.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(currency) = update.base_currency {
            active.base_currency = Set(currency);
        }
        if let Some(enabled) = update.accounting_enabled {
            active.accounting_enabled = Set(enabled);
        }
        if let Some(account) = update.receivable_account_id {
            active.receivable_account_id = Set(account);
        }
        if let Some(account) = update.payable_account_id {
            active.payable_account_id = Set(account);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await
    }

    /// Adds a user to an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add_user(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<organization_users::Model, DbErr> {
        let now = chrono::Utc::now().into();

        let org_user = organization_users::ActiveModel {
            user_id: Set(user_id),
            organization_id: Set(org_id),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
        };

        org_user.insert(&self.db).await
    }

    /// Removes a user from an organization. Returns whether a
    /// membership row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn remove_user(&self, org_id: Uuid, user_id: Uuid) -> Result<bool, DbErr> {
        let result = organization_users::Entity::delete_many()
            .filter(organization_users::Column::OrganizationId.eq(org_id))
            .filter(organization_users::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Gets all users in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_users(
        &self,
        org_id: Uuid,
    ) -> Result<Vec<(users::Model, organization_users::Model)>, DbErr> {
        organization_users::Entity::find()
            .filter(organization_users::Column::OrganizationId.eq(org_id))
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .map(|results| {
                results
                    .into_iter()
                    .filter_map(|(ou, user)| user.map(|u| (u, ou)))
                    .collect()
            })
    }

    /// Gets a user's membership in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_user_membership(
        &self,
        org_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<organization_users::Model>, DbErr> {
        organization_users::Entity::find()
            .filter(organization_users::Column::OrganizationId.eq(org_id))
            .filter(organization_users::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Checks if a user is a member of an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_member(&self, org_id: Uuid, user_id: Uuid) -> Result<bool, DbErr> {
        let count = organization_users::Entity::find()
            .filter(organization_users::Column::OrganizationId.eq(org_id))
            .filter(organization_users::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Checks if a user has a specific role or higher in an organization.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn has_role(
        &self,
        org_id: Uuid,
        user_id: Uuid,
        required_role: UserRole,
    ) -> Result<bool, DbErr> {
        let membership = self.get_user_membership(org_id, user_id).await?;

        Ok(membership.is_some_and(|m| role_level(m.role) >= role_level(required_role)))
    }
}

/// Returns the privilege level of a role (higher = more privileges).
const fn role_level(role: UserRole) -> u8 {
    match role {
        UserRole::Owner => 100,
        UserRole::Admin => 80,
        UserRole::Operator => 40,
        UserRole::Viewer => 20,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_levels_are_ordered() {
        assert!(role_level(UserRole::Owner) > role_level(UserRole::Admin));
        assert!(role_level(UserRole::Admin) > role_level(UserRole::Operator));
        assert!(role_level(UserRole::Operator) > role_level(UserRole::Viewer));
    }
}
