//! `SeaORM` Entity for organizations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "organizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub base_currency: String,
    pub accounting_enabled: bool,
    /// Default receivables account for client bills when accounting is enabled.
    pub receivable_account_id: Option<Uuid>,
    /// Default payables account for provider bills when accounting is enabled.
    pub payable_account_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::organization_users::Entity")]
    OrganizationUsers,
    #[sea_orm(has_many = "super::chart_accounts::Entity")]
    ChartAccounts,
    #[sea_orm(has_many = "super::treasury_accounts::Entity")]
    TreasuryAccounts,
    #[sea_orm(has_many = "super::bills::Entity")]
    Bills,
}

impl Related<super::organization_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrganizationUsers.def()
    }
}

impl Related<super::chart_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartAccounts.def()
    }
}

impl Related<super::treasury_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TreasuryAccounts.def()
    }
}

impl Related<super::bills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
