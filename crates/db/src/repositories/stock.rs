//! Stock repository: site materials and their movements.
//!
//! `quantity_on_hand` is a denormalized projection of the movement
//! log, maintained the same way treasury balances are: every movement
//! mutation commits its row change and the quantity adjustment in one
//! database transaction, and a mutation that would drive the quantity
//! negative is rejected.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use obralis_core::stock::{
    MovementKind, StockError as CoreStockError, apply_movement_change, signed_delta,
};

use crate::entities::{stock_items, stock_movements};

/// Error types for stock operations.
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    /// Stock item not found.
    #[error("Stock item not found: {0}")]
    ItemNotFound(Uuid),

    /// Movement not found.
    #[error("Stock movement not found: {0}")]
    MovementNotFound(Uuid),

    /// Items with movement history cannot be deleted.
    #[error("Stock item has movements; deactivate it instead")]
    HasMovements,

    /// Quantity rule violation.
    #[error(transparent)]
    Validation(#[from] CoreStockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a stock item.
#[derive(Debug, Clone)]
pub struct CreateItemInput {
    /// Material name.
    pub name: String,
    /// Unit of measure (bags, m3, units).
    pub unit: String,
}

/// Input for recording a movement.
#[derive(Debug, Clone)]
pub struct CreateMovementInput {
    /// Item moved.
    pub item_id: Uuid,
    /// Inbound, outbound or adjustment.
    pub kind: MovementKind,
    /// Quantity; positive for inbound/outbound, signed for adjustments.
    pub quantity: Decimal,
    /// Date of the movement.
    pub movement_date: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
    /// Recording user.
    pub created_by: Option<Uuid>,
}

/// Fields that can change on a movement. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateMovementInput {
    /// New kind.
    pub kind: Option<MovementKind>,
    /// New quantity.
    pub quantity: Option<Decimal>,
    /// New date.
    pub movement_date: Option<NaiveDate>,
    /// Replace the note (`Some(None)` clears it).
    pub note: Option<Option<String>>,
}

/// Stock repository for items and movements.
#[derive(Debug, Clone)]
pub struct StockRepository {
    db: DatabaseConnection,
}

impl StockRepository {
    /// Creates a new stock repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    // ---- items ----

    /// Creates a stock item with zero quantity on hand.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_item(
        &self,
        organization_id: Uuid,
        input: CreateItemInput,
    ) -> Result<stock_items::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let model = stock_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            name: Set(input.name),
            unit: Set(input.unit),
            quantity_on_hand: Set(Decimal::ZERO),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.db).await
    }

    /// Gets a stock item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is missing or the query fails.
    pub async fn get_item(
        &self,
        organization_id: Uuid,
        item_id: Uuid,
    ) -> Result<stock_items::Model, StockError> {
        stock_items::Entity::find_by_id(item_id)
            .filter(stock_items::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await?
            .ok_or(StockError::ItemNotFound(item_id))
    }

    /// Lists stock items by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_items(
        &self,
        organization_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<stock_items::Model>, DbErr> {
        let mut query = stock_items::Entity::find()
            .filter(stock_items::Column::OrganizationId.eq(organization_id));
        if !include_inactive {
            query = query.filter(stock_items::Column::IsActive.eq(true));
        }
        query
            .order_by_asc(stock_items::Column::Name)
            .all(&self.db)
            .await
    }

    /// Updates an item's name, unit or active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is missing or the update fails.
    pub async fn update_item(
        &self,
        organization_id: Uuid,
        item_id: Uuid,
        name: Option<String>,
        unit: Option<String>,
        is_active: Option<bool>,
    ) -> Result<stock_items::Model, StockError> {
        let item = self.get_item(organization_id, item_id).await?;

        let mut active: stock_items::ActiveModel = item.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(unit) = unit {
            active.unit = Set(unit);
        }
        if let Some(flag) = is_active {
            active.is_active = Set(flag);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an item with no movement history.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is missing, has movements, or the
    /// delete fails.
    pub async fn delete_item(
        &self,
        organization_id: Uuid,
        item_id: Uuid,
    ) -> Result<(), StockError> {
        let item = self.get_item(organization_id, item_id).await?;

        let has_movements = stock_movements::Entity::find()
            .filter(stock_movements::Column::ItemId.eq(item_id))
            .one(&self.db)
            .await?
            .is_some();
        if has_movements {
            return Err(StockError::HasMovements);
        }

        stock_items::Entity::delete_by_id(item.id)
            .exec(&self.db)
            .await?;

        Ok(())
    }

    // ---- movements ----

    /// Records a movement and adjusts the quantity on hand, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity is invalid, the result would
    /// be negative, the item is missing, or the database operation
    /// fails.
    pub async fn create_movement(
        &self,
        organization_id: Uuid,
        input: CreateMovementInput,
    ) -> Result<stock_movements::Model, StockError> {
        let delta = signed_delta(input.kind, input.quantity)?;

        let txn = self.db.begin().await?;

        let item = load_item(&txn, organization_id, input.item_id).await?;
        let new_quantity = apply_movement_change(item.quantity_on_hand, Decimal::ZERO, delta)?;

        let now = chrono::Utc::now().into();
        let model = stock_movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(organization_id),
            item_id: Set(input.item_id),
            kind: Set(input.kind.into()),
            quantity: Set(input.quantity),
            movement_date: Set(input.movement_date),
            note: Set(input.note),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = model.insert(&txn).await?;

        set_quantity(&txn, item, new_quantity).await?;

        txn.commit().await?;

        Ok(model)
    }

    /// Lists movements for an item, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_movements(
        &self,
        organization_id: Uuid,
        item_id: Uuid,
    ) -> Result<Vec<stock_movements::Model>, DbErr> {
        stock_movements::Entity::find()
            .filter(stock_movements::Column::OrganizationId.eq(organization_id))
            .filter(stock_movements::Column::ItemId.eq(item_id))
            .order_by_desc(stock_movements::Column::MovementDate)
            .order_by_desc(stock_movements::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Updates a movement, reverting its old delta and applying the
    /// new one in the same database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the new quantity is invalid, the result
    /// would be negative, or the database operation fails.
    pub async fn update_movement(
        &self,
        organization_id: Uuid,
        movement_id: Uuid,
        input: UpdateMovementInput,
    ) -> Result<stock_movements::Model, StockError> {
        let txn = self.db.begin().await?;

        let movement = stock_movements::Entity::find_by_id(movement_id)
            .filter(stock_movements::Column::OrganizationId.eq(organization_id))
            .one(&txn)
            .await?
            .ok_or(StockError::MovementNotFound(movement_id))?;

        let old_kind: MovementKind = movement.kind.into();
        let old_delta = signed_delta(old_kind, movement.quantity)?;

        let new_kind = input.kind.unwrap_or(old_kind);
        let new_quantity = input.quantity.unwrap_or(movement.quantity);
        let new_delta = signed_delta(new_kind, new_quantity)?;

        let item = load_item(&txn, organization_id, movement.item_id).await?;
        let resulting = apply_movement_change(item.quantity_on_hand, old_delta, new_delta)?;

        let mut active: stock_movements::ActiveModel = movement.into();
        active.kind = Set(new_kind.into());
        active.quantity = Set(new_quantity);
        if let Some(date) = input.movement_date {
            active.movement_date = Set(date);
        }
        if let Some(note) = input.note {
            active.note = Set(note);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let model = active.update(&txn).await?;

        set_quantity(&txn, item, resulting).await?;

        txn.commit().await?;

        Ok(model)
    }

    /// Deletes a movement and reverts its quantity contribution.
    ///
    /// # Errors
    ///
    /// Returns an error if reverting would drive the quantity
    /// negative, the movement is missing, or the database operation
    /// fails.
    pub async fn delete_movement(
        &self,
        organization_id: Uuid,
        movement_id: Uuid,
    ) -> Result<(), StockError> {
        let txn = self.db.begin().await?;

        let movement = stock_movements::Entity::find_by_id(movement_id)
            .filter(stock_movements::Column::OrganizationId.eq(organization_id))
            .one(&txn)
            .await?
            .ok_or(StockError::MovementNotFound(movement_id))?;

        let kind: MovementKind = movement.kind.into();
        let delta = signed_delta(kind, movement.quantity)?;

        let item = load_item(&txn, organization_id, movement.item_id).await?;
        let resulting = apply_movement_change(item.quantity_on_hand, delta, Decimal::ZERO)?;

        stock_movements::Entity::delete_by_id(movement.id)
            .exec(&txn)
            .await?;

        set_quantity(&txn, item, resulting).await?;

        txn.commit().await?;

        Ok(())
    }
}

async fn load_item(
    txn: &DatabaseTransaction,
    organization_id: Uuid,
    item_id: Uuid,
) -> Result<stock_items::Model, StockError> {
    stock_items::Entity::find_by_id(item_id)
        .filter(stock_items::Column::OrganizationId.eq(organization_id))
        .one(txn)
        .await?
        .ok_or(StockError::ItemNotFound(item_id))
}

async fn set_quantity(
    txn: &DatabaseTransaction,
    item: stock_items::Model,
    quantity: Decimal,
) -> Result<(), DbErr> {
    let mut active: stock_items::ActiveModel = item.into();
    active.quantity_on_hand = Set(quantity);
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(txn).await?;
    Ok(())
}
