//! Wiki repository: per-organization documentation pages.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::wiki_pages;

/// Error types for wiki operations.
#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    /// Page not found.
    #[error("Wiki page not found: {0}")]
    NotFound(String),

    /// Slug already used within the organization.
    #[error("Wiki slug already exists: {0}")]
    DuplicateSlug(String),

    /// Slug failed validation.
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Fields that can change on a page. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePageInput {
    /// New title.
    pub title: Option<String>,
    /// New body; bumps the revision counter.
    pub body: Option<String>,
    /// Publish or unpublish.
    pub is_published: Option<bool>,
}

/// Wiki repository for page CRUD.
#[derive(Debug, Clone)]
pub struct WikiRepository {
    db: DatabaseConnection,
}

impl WikiRepository {
    /// Creates a new wiki repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a page at revision 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the slug is invalid or taken, or the insert
    /// fails.
    pub async fn create(
        &self,
        organization_id: Uuid,
        slug: String,
        title: String,
        body: String,
        created_by: Option<Uuid>,
    ) -> Result<wiki_pages::Model, WikiError> {
        validate_slug(&slug)?;

        let taken = wiki_pages::Entity::find()
            .filter(wiki_pages::Column::OrganizationId.eq(organization_id))
            .filter(wiki_pages::Column::Slug.eq(slug.clone()))
            .one(&self.db)
            .await?
            .is_some();
        if taken {
            return Err(WikiError::DuplicateSlug(slug));
        }

        let now = chrono::Utc::now().into();
        let model = wiki_pages::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            slug: Set(slug),
            title: Set(title),
            body: Set(body),
            is_published: Set(false),
            revision: Set(1),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Gets a page by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is missing or the query fails.
    pub async fn get_by_slug(
        &self,
        organization_id: Uuid,
        slug: &str,
    ) -> Result<wiki_pages::Model, WikiError> {
        wiki_pages::Entity::find()
            .filter(wiki_pages::Column::OrganizationId.eq(organization_id))
            .filter(wiki_pages::Column::Slug.eq(slug))
            .one(&self.db)
            .await?
            .ok_or_else(|| WikiError::NotFound(slug.to_string()))
    }

    /// Lists pages by title; `published_only` hides drafts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        organization_id: Uuid,
        published_only: bool,
    ) -> Result<Vec<wiki_pages::Model>, DbErr> {
        let mut query = wiki_pages::Entity::find()
            .filter(wiki_pages::Column::OrganizationId.eq(organization_id));
        if published_only {
            query = query.filter(wiki_pages::Column::IsPublished.eq(true));
        }
        query
            .order_by_asc(wiki_pages::Column::Title)
            .all(&self.db)
            .await
    }

    /// Updates a page; a body change bumps the revision counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is missing or the update fails.
    pub async fn update(
        &self,
        organization_id: Uuid,
        slug: &str,
        input: UpdatePageInput,
    ) -> Result<wiki_pages::Model, WikiError> {
        let page = self.get_by_slug(organization_id, slug).await?;
        let revision = page.revision;

        let mut active: wiki_pages::ActiveModel = page.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(body) = input.body {
            active.body = Set(body);
            active.revision = Set(revision + 1);
        }
        if let Some(flag) = input.is_published {
            active.is_published = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a page.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is missing or the delete fails.
    pub async fn delete(&self, organization_id: Uuid, slug: &str) -> Result<(), WikiError> {
        let page = self.get_by_slug(organization_id, slug).await?;
        wiki_pages::Entity::delete_by_id(page.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

/// Slugs are lowercase alphanumeric with hyphens, non-empty, and
/// never start or end with a hyphen.
fn validate_slug(slug: &str) -> Result<(), WikiError> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(WikiError::InvalidSlug(slug.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("site-safety").is_ok());
        assert!(validate_slug("notes2").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("trailing-").is_err());
        assert!(validate_slug("Has Spaces").is_err());
    }
}
