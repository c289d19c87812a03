//! Wiki routes: per-organization documentation pages addressed by slug.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::routes::{ensure_member, ensure_role, internal_error};
use crate::{AppState, middleware::AuthUser};
use obralis_db::entities::sea_orm_active_enums::UserRole;
use obralis_db::repositories::wiki::{UpdatePageInput, WikiError, WikiRepository};

/// Creates the wiki routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/wiki",
            get(list_pages).post(create_page),
        )
        .route(
            "/organizations/{org_id}/wiki/{slug}",
            get(get_page).put(update_page).delete(delete_page),
        )
}

/// Request body for creating a wiki page.
#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    /// URL-safe page identifier, unique within the organization.
    pub slug: String,
    /// Page title.
    pub title: String,
    /// Page body (markdown).
    pub body: String,
}

/// Request body for updating a wiki page.
#[derive(Debug, Deserialize)]
pub struct UpdatePageRequest {
    /// New title.
    pub title: Option<String>,
    /// New body; bumps the revision counter.
    pub body: Option<String>,
    /// Publish or unpublish.
    pub is_published: Option<bool>,
}

/// Query parameters for listing pages.
#[derive(Debug, Deserialize)]
pub struct ListPagesQuery {
    /// Only return published pages.
    #[serde(default)]
    pub published_only: bool,
}

fn page_json(page: &obralis_db::entities::wiki_pages::Model) -> serde_json::Value {
    json!({
        "id": page.id,
        "slug": page.slug,
        "title": page.title,
        "body": page.body,
        "is_published": page.is_published,
        "revision": page.revision,
        "created_at": page.created_at,
        "updated_at": page.updated_at
    })
}

fn page_summary_json(page: &obralis_db::entities::wiki_pages::Model) -> serde_json::Value {
    json!({
        "id": page.id,
        "slug": page.slug,
        "title": page.title,
        "is_published": page.is_published,
        "revision": page.revision,
        "updated_at": page.updated_at
    })
}

fn wiki_error_response(e: &WikiError) -> Response {
    let (status, error): (StatusCode, &str) = match e {
        WikiError::NotFound(_) => (StatusCode::NOT_FOUND, "page_not_found"),
        WikiError::DuplicateSlug(_) => (StatusCode::CONFLICT, "duplicate_slug"),
        WikiError::InvalidSlug(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_slug"),
        WikiError::Database(_) => {
            error!(error = %e, "Wiki operation failed");
            return internal_error();
        }
    };
    (
        status,
        Json(json!({ "error": error, "message": e.to_string() })),
    )
        .into_response()
}

/// GET /organizations/{org_id}/wiki - List pages (bodies omitted).
async fn list_pages(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListPagesQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = WikiRepository::new((*state.db).clone());
    match repo.list(org_id, query.published_only).await {
        Ok(pages) => {
            let pages: Vec<_> = pages.iter().map(page_summary_json).collect();
            (StatusCode::OK, Json(json!({ "pages": pages }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing wiki pages");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/wiki - Create a page.
async fn create_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreatePageRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = WikiRepository::new((*state.db).clone());
    match repo
        .create(
            org_id,
            payload.slug,
            payload.title,
            payload.body,
            Some(auth.user_id()),
        )
        .await
    {
        Ok(page) => {
            info!(org_id = %org_id, slug = %page.slug, "Wiki page created");
            (StatusCode::CREATED, Json(page_json(&page))).into_response()
        }
        Err(e) => wiki_error_response(&e),
    }
}

/// GET /organizations/{org_id}/wiki/{slug}
async fn get_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, slug)): Path<(Uuid, String)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = WikiRepository::new((*state.db).clone());
    match repo.get_by_slug(org_id, &slug).await {
        Ok(page) => (StatusCode::OK, Json(page_json(&page))).into_response(),
        Err(e) => wiki_error_response(&e),
    }
}

/// PUT /organizations/{org_id}/wiki/{slug}
async fn update_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, slug)): Path<(Uuid, String)>,
    Json(payload): Json<UpdatePageRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = WikiRepository::new((*state.db).clone());
    let input = UpdatePageInput {
        title: payload.title,
        body: payload.body,
        is_published: payload.is_published,
    };

    match repo.update(org_id, &slug, input).await {
        Ok(page) => (StatusCode::OK, Json(page_json(&page))).into_response(),
        Err(e) => wiki_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/wiki/{slug}
async fn delete_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, slug)): Path<(Uuid, String)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = WikiRepository::new((*state.db).clone());
    match repo.delete(org_id, &slug).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Wiki page deleted" })),
        )
            .into_response(),
        Err(e) => wiki_error_response(&e),
    }
}
