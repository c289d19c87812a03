//! Stock routes: material items and their movements.

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

use crate::routes::{ensure_member, ensure_role, internal_error};
use crate::{AppState, middleware::AuthUser};
use obralis_core::stock::MovementKind;
use obralis_db::entities::sea_orm_active_enums::UserRole;
use obralis_db::repositories::stock::{
    CreateItemInput, CreateMovementInput, StockError, StockRepository, UpdateMovementInput,
};

/// Creates the stock routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/organizations/{org_id}/stock/items",
            get(list_items).post(create_item),
        )
        .route(
            "/organizations/{org_id}/stock/items/{item_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route(
            "/organizations/{org_id}/stock/items/{item_id}/movements",
            get(list_movements).post(create_movement),
        )
        .route(
            "/organizations/{org_id}/stock/movements/{movement_id}",
            patch(update_movement).delete(delete_movement),
        )
}

/// Request body for creating a stock item.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    /// Material name.
    pub name: String,
    /// Unit of measure (bags, m3, units).
    pub unit: String,
}

/// Request body for updating a stock item.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// New material name.
    pub name: Option<String>,
    /// New unit of measure.
    pub unit: Option<String>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Request body for recording a movement.
#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    /// inbound, outbound or adjustment.
    pub kind: MovementKind,
    /// Quantity; positive for inbound/outbound, signed for adjustments.
    pub quantity: Decimal,
    /// Date of the movement.
    pub movement_date: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
}

/// Request body for updating a movement.
#[derive(Debug, Deserialize)]
pub struct UpdateMovementRequest {
    /// New kind.
    pub kind: Option<MovementKind>,
    /// New quantity.
    pub quantity: Option<Decimal>,
    /// New date.
    pub movement_date: Option<NaiveDate>,
    /// Replace the note (`null` clears it).
    #[serde(default, with = "crate::routes::double_option")]
    pub note: Option<Option<String>>,
}

/// Query parameters for listing items.
#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    /// Include deactivated items.
    #[serde(default)]
    pub include_inactive: bool,
}

fn item_json(item: &obralis_db::entities::stock_items::Model) -> serde_json::Value {
    json!({
        "id": item.id,
        "name": item.name,
        "unit": item.unit,
        "quantity_on_hand": item.quantity_on_hand,
        "is_active": item.is_active,
        "created_at": item.created_at
    })
}

fn movement_json(movement: &obralis_db::entities::stock_movements::Model) -> serde_json::Value {
    json!({
        "id": movement.id,
        "item_id": movement.item_id,
        "kind": movement.kind,
        "quantity": movement.quantity,
        "movement_date": movement.movement_date,
        "note": movement.note,
        "created_at": movement.created_at
    })
}

fn stock_error_response(e: &StockError) -> Response {
    let (status, error): (StatusCode, &str) = match e {
        StockError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "item_not_found"),
        StockError::MovementNotFound(_) => (StatusCode::NOT_FOUND, "movement_not_found"),
        StockError::HasMovements => (StatusCode::CONFLICT, "item_has_movements"),
        StockError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_quantity"),
        StockError::Database(_) => {
            error!(error = %e, "Stock operation failed");
            return internal_error();
        }
    };
    (
        status,
        Json(json!({ "error": error, "message": e.to_string() })),
    )
        .into_response()
}

/// GET /organizations/{org_id}/stock/items - List stock items.
async fn list_items(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Query(query): Query<ListItemsQuery>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = StockRepository::new((*state.db).clone());
    match repo.list_items(org_id, query.include_inactive).await {
        Ok(items) => {
            let items: Vec<_> = items.iter().map(item_json).collect();
            (StatusCode::OK, Json(json!({ "items": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing stock items");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/stock/items - Create a stock item.
async fn create_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<CreateItemRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = StockRepository::new((*state.db).clone());
    let input = CreateItemInput {
        name: payload.name,
        unit: payload.unit,
    };

    match repo.create_item(org_id, input).await {
        Ok(item) => {
            info!(org_id = %org_id, item_id = %item.id, "Stock item created");
            (StatusCode::CREATED, Json(item_json(&item))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create stock item");
            internal_error()
        }
    }
}

/// GET /organizations/{org_id}/stock/items/{item_id}
async fn get_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, item_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = StockRepository::new((*state.db).clone());
    match repo.get_item(org_id, item_id).await {
        Ok(item) => (StatusCode::OK, Json(item_json(&item))).into_response(),
        Err(e) => stock_error_response(&e),
    }
}

/// PUT /organizations/{org_id}/stock/items/{item_id}
async fn update_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateItemRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = StockRepository::new((*state.db).clone());
    match repo
        .update_item(org_id, item_id, payload.name, payload.unit, payload.is_active)
        .await
    {
        Ok(item) => (StatusCode::OK, Json(item_json(&item))).into_response(),
        Err(e) => stock_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/stock/items/{item_id}
async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, item_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = StockRepository::new((*state.db).clone());
    match repo.delete_item(org_id, item_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Stock item deleted" })),
        )
            .into_response(),
        Err(e) => stock_error_response(&e),
    }
}

/// GET /organizations/{org_id}/stock/items/{item_id}/movements
async fn list_movements(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, item_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_member(&state, org_id, auth.user_id()).await {
        return response;
    }

    let repo = StockRepository::new((*state.db).clone());
    match repo.list_movements(org_id, item_id).await {
        Ok(movements) => {
            let movements: Vec<_> = movements.iter().map(movement_json).collect();
            (StatusCode::OK, Json(json!({ "movements": movements }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Database error listing movements");
            internal_error()
        }
    }
}

/// POST /organizations/{org_id}/stock/items/{item_id}/movements - Record a
/// movement and adjust the item's quantity on hand.
async fn create_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, item_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CreateMovementRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = StockRepository::new((*state.db).clone());
    let input = CreateMovementInput {
        item_id,
        kind: payload.kind,
        quantity: payload.quantity,
        movement_date: payload.movement_date,
        note: payload.note,
        created_by: Some(auth.user_id()),
    };

    match repo.create_movement(org_id, input).await {
        Ok(movement) => {
            info!(org_id = %org_id, item_id = %item_id, movement_id = %movement.id, "Movement recorded");
            (StatusCode::CREATED, Json(movement_json(&movement))).into_response()
        }
        Err(e) => stock_error_response(&e),
    }
}

/// PATCH /organizations/{org_id}/stock/movements/{movement_id}
async fn update_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, movement_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateMovementRequest>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = StockRepository::new((*state.db).clone());
    let input = UpdateMovementInput {
        kind: payload.kind,
        quantity: payload.quantity,
        movement_date: payload.movement_date,
        note: payload.note,
    };

    match repo.update_movement(org_id, movement_id, input).await {
        Ok(movement) => (StatusCode::OK, Json(movement_json(&movement))).into_response(),
        Err(e) => stock_error_response(&e),
    }
}

/// DELETE /organizations/{org_id}/stock/movements/{movement_id}
async fn delete_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((org_id, movement_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    if let Err(response) = ensure_role(&state, org_id, auth.user_id(), UserRole::Operator).await {
        return response;
    }

    let repo = StockRepository::new((*state.db).clone());
    match repo.delete_movement(org_id, movement_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "Movement deleted" })),
        )
            .into_response(),
        Err(e) => stock_error_response(&e),
    }
}
