//! `SeaORM` Entity for account_balances table.
//!
//! Denormalized running balance per (treasury account, currency),
//! maintained incrementally by the treasury and billing repositories.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "account_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub treasury_account_id: Uuid,
    pub currency: String,
    pub balance: Decimal,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::treasury_accounts::Entity",
        from = "Column::TreasuryAccountId",
        to = "super::treasury_accounts::Column::Id"
    )]
    TreasuryAccounts,
}

impl Related<super::treasury_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TreasuryAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
