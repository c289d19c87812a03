//! `SeaORM` Entity for checks table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CheckKind, CheckStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "checks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    pub kind: CheckKind,
    pub status: CheckStatus,
    pub number: String,
    /// Payee for issued checks, drawer for received ones.
    pub counterparty: String,
    pub amount: Decimal,
    pub currency: String,
    pub issue_date: Date,
    pub due_date: Option<Date>,
    /// Treasury account debited or credited on settlement.
    pub treasury_account_id: Option<Uuid>,
    /// Treasury transaction created on settlement.
    pub settlement_transaction_id: Option<Uuid>,
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
