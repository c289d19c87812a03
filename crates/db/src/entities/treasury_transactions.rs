//! `SeaORM` Entity for treasury_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TransactionDirection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "treasury_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub treasury_account_id: Uuid,
    pub direction: TransactionDirection,
    /// Stored positive; the direction carries the sign.
    pub amount: Decimal,
    pub currency: String,
    pub transaction_date: Date,
    pub description: String,
    /// Category ledger account for auto-posting.
    pub category_account_id: Option<Uuid>,
    /// `BILL-{payment_id}` / `COLL-{payment_id}` for payment-linked rows.
    pub reference: Option<String>,
    /// Shared by the two legs of a transfer.
    pub transfer_group_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organizations::Entity",
        from = "Column::OrganizationId",
        to = "super::organizations::Column::Id"
    )]
    Organizations,
    #[sea_orm(
        belongs_to = "super::treasury_accounts::Entity",
        from = "Column::TreasuryAccountId",
        to = "super::treasury_accounts::Column::Id"
    )]
    TreasuryAccounts,
}

impl Related<super::organizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizations.def()
    }
}

impl Related<super::treasury_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TreasuryAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
