//! `SeaORM` Entity for payments table.
//!
//! A payment applies money against a bill. Its treasury counterpart is
//! a transaction whose reference is `BILL-{payment_id}` or
//! `COLL-{payment_id}` depending on the bill kind.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub bill_id: Uuid,
    pub treasury_account_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub payment_date: Date,
    pub note: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bills::Entity",
        from = "Column::BillId",
        to = "super::bills::Column::Id"
    )]
    Bills,
    #[sea_orm(
        belongs_to = "super::treasury_accounts::Entity",
        from = "Column::TreasuryAccountId",
        to = "super::treasury_accounts::Column::Id"
    )]
    TreasuryAccounts,
}

impl Related<super::bills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl Related<super::treasury_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TreasuryAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
