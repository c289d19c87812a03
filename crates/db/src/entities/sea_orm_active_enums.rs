//! Postgres enum mappings for entity columns.
//!
//! Each enum mirrors a `CREATE TYPE ... AS ENUM` in the initial
//! migration. Conversions to the `obralis-core` domain enums live here
//! so repositories can hand rows straight to the business rules.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, can transfer ownership.
    #[sea_orm(string_value = "owner")]
    Owner,
    /// Full access except ownership transfer.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Can record treasury, billing and stock operations.
    #[sea_orm(string_value = "operator")]
    Operator,
    /// Read-only access.
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl From<UserRole> for obralis_core::auth::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Owner => Self::Owner,
            UserRole::Admin => Self::Admin,
            UserRole::Operator => Self::Operator,
            UserRole::Viewer => Self::Viewer,
        }
    }
}

impl From<obralis_core::auth::UserRole> for UserRole {
    fn from(role: obralis_core::auth::UserRole) -> Self {
        match role {
            obralis_core::auth::UserRole::Owner => Self::Owner,
            obralis_core::auth::UserRole::Admin => Self::Admin,
            obralis_core::auth::UserRole::Operator => Self::Operator,
            obralis_core::auth::UserRole::Viewer => Self::Viewer,
        }
    }
}

/// Ledger account type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Resources owned by the organization.
    #[sea_orm(string_value = "asset")]
    Asset,
    /// Obligations owed to others.
    #[sea_orm(string_value = "liability")]
    Liability,
    /// Residual interest of the owners.
    #[sea_orm(string_value = "equity")]
    Equity,
    /// Income earned.
    #[sea_orm(string_value = "revenue")]
    Revenue,
    /// Costs incurred.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<AccountType> for obralis_core::ledger::AccountType {
    fn from(t: AccountType) -> Self {
        match t {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<obralis_core::ledger::AccountType> for AccountType {
    fn from(t: obralis_core::ledger::AccountType) -> Self {
        match t {
            obralis_core::ledger::AccountType::Asset => Self::Asset,
            obralis_core::ledger::AccountType::Liability => Self::Liability,
            obralis_core::ledger::AccountType::Equity => Self::Equity,
            obralis_core::ledger::AccountType::Revenue => Self::Revenue,
            obralis_core::ledger::AccountType::Expense => Self::Expense,
        }
    }
}

/// Journal line side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_side")]
#[serde(rename_all = "lowercase")]
pub enum JournalSide {
    /// Debit line.
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Credit line.
    #[sea_orm(string_value = "credit")]
    Credit,
}

impl From<JournalSide> for obralis_core::ledger::JournalSide {
    fn from(s: JournalSide) -> Self {
        match s {
            JournalSide::Debit => Self::Debit,
            JournalSide::Credit => Self::Credit,
        }
    }
}

impl From<obralis_core::ledger::JournalSide> for JournalSide {
    fn from(s: obralis_core::ledger::JournalSide) -> Self {
        match s {
            obralis_core::ledger::JournalSide::Debit => Self::Debit,
            obralis_core::ledger::JournalSide::Credit => Self::Credit,
        }
    }
}

/// Origin of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_source")]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Entered by hand through the journal endpoint.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Generated from a treasury transaction.
    #[sea_orm(string_value = "treasury")]
    Treasury,
    /// Generated from a bill or payment.
    #[sea_orm(string_value = "billing")]
    Billing,
}

/// Kind of treasury account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "treasury_account_kind")]
#[serde(rename_all = "snake_case")]
pub enum TreasuryAccountKind {
    /// Physical cash box at a site or office.
    #[sea_orm(string_value = "cash_box")]
    CashBox,
    /// Bank account.
    #[sea_orm(string_value = "bank_account")]
    BankAccount,
}

impl From<TreasuryAccountKind> for obralis_core::treasury::TreasuryAccountKind {
    fn from(k: TreasuryAccountKind) -> Self {
        match k {
            TreasuryAccountKind::CashBox => Self::CashBox,
            TreasuryAccountKind::BankAccount => Self::BankAccount,
        }
    }
}

impl From<obralis_core::treasury::TreasuryAccountKind> for TreasuryAccountKind {
    fn from(k: obralis_core::treasury::TreasuryAccountKind) -> Self {
        match k {
            obralis_core::treasury::TreasuryAccountKind::CashBox => Self::CashBox,
            obralis_core::treasury::TreasuryAccountKind::BankAccount => Self::BankAccount,
        }
    }
}

/// Direction of a treasury transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_direction")]
#[serde(rename_all = "snake_case")]
pub enum TransactionDirection {
    /// Money entering the treasury account.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money leaving the treasury account.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<TransactionDirection> for obralis_core::balance::Direction {
    fn from(d: TransactionDirection) -> Self {
        match d {
            TransactionDirection::Income => Self::Income,
            TransactionDirection::Expense => Self::Expense,
        }
    }
}

impl From<obralis_core::balance::Direction> for TransactionDirection {
    fn from(d: obralis_core::balance::Direction) -> Self {
        match d {
            obralis_core::balance::Direction::Income => Self::Income,
            obralis_core::balance::Direction::Expense => Self::Expense,
        }
    }
}

/// Whether a check was issued or received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "check_kind")]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Check written by the organization.
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Third-party check received from a client.
    #[sea_orm(string_value = "received")]
    Received,
}

impl From<CheckKind> for obralis_core::treasury::CheckKind {
    fn from(k: CheckKind) -> Self {
        match k {
            CheckKind::Issued => Self::Issued,
            CheckKind::Received => Self::Received,
        }
    }
}

/// Check lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "check_status")]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Issued check written but not yet handed over.
    #[sea_orm(string_value = "issued")]
    Issued,
    /// Issued check handed to the payee.
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Issued check debited by the bank.
    #[sea_orm(string_value = "cashed")]
    Cashed,
    /// Received check in the drawer.
    #[sea_orm(string_value = "held")]
    Held,
    /// Received check deposited at the bank.
    #[sea_orm(string_value = "deposited")]
    Deposited,
    /// Received check credited by the bank.
    #[sea_orm(string_value = "credited")]
    Credited,
    /// Bounced, either kind.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<CheckStatus> for obralis_core::treasury::CheckStatus {
    fn from(s: CheckStatus) -> Self {
        match s {
            CheckStatus::Issued => Self::Issued,
            CheckStatus::Delivered => Self::Delivered,
            CheckStatus::Cashed => Self::Cashed,
            CheckStatus::Held => Self::Held,
            CheckStatus::Deposited => Self::Deposited,
            CheckStatus::Credited => Self::Credited,
            CheckStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<obralis_core::treasury::CheckStatus> for CheckStatus {
    fn from(s: obralis_core::treasury::CheckStatus) -> Self {
        match s {
            obralis_core::treasury::CheckStatus::Issued => Self::Issued,
            obralis_core::treasury::CheckStatus::Delivered => Self::Delivered,
            obralis_core::treasury::CheckStatus::Cashed => Self::Cashed,
            obralis_core::treasury::CheckStatus::Held => Self::Held,
            obralis_core::treasury::CheckStatus::Deposited => Self::Deposited,
            obralis_core::treasury::CheckStatus::Credited => Self::Credited,
            obralis_core::treasury::CheckStatus::Rejected => Self::Rejected,
        }
    }
}

/// Which side of the ledger a bill sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bill_kind")]
#[serde(rename_all = "snake_case")]
pub enum BillKind {
    /// Issued to a client (receivable).
    #[sea_orm(string_value = "client")]
    Client,
    /// Received from a provider (payable).
    #[sea_orm(string_value = "provider")]
    Provider,
}

impl From<BillKind> for obralis_core::billing::BillKind {
    fn from(k: BillKind) -> Self {
        match k {
            BillKind::Client => Self::Client,
            BillKind::Provider => Self::Provider,
        }
    }
}

impl From<obralis_core::billing::BillKind> for BillKind {
    fn from(k: obralis_core::billing::BillKind) -> Self {
        match k {
            obralis_core::billing::BillKind::Client => Self::Client,
            obralis_core::billing::BillKind::Provider => Self::Provider,
        }
    }
}

/// Derived settlement state of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bill_status")]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// No live payments.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid total is positive but below the bill total.
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    /// Paid total equals the bill total.
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl From<obralis_core::billing::BillStatus> for BillStatus {
    fn from(s: obralis_core::billing::BillStatus) -> Self {
        match s {
            obralis_core::billing::BillStatus::Pending => Self::Pending,
            obralis_core::billing::BillStatus::PartiallyPaid => Self::PartiallyPaid,
            obralis_core::billing::BillStatus::Paid => Self::Paid,
        }
    }
}

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "movement_kind")]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received.
    #[sea_orm(string_value = "inbound")]
    Inbound,
    /// Goods consumed or shipped.
    #[sea_orm(string_value = "outbound")]
    Outbound,
    /// Manual correction.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

impl From<MovementKind> for obralis_core::stock::MovementKind {
    fn from(k: MovementKind) -> Self {
        match k {
            MovementKind::Inbound => Self::Inbound,
            MovementKind::Outbound => Self::Outbound,
            MovementKind::Adjustment => Self::Adjustment,
        }
    }
}

impl From<obralis_core::stock::MovementKind> for MovementKind {
    fn from(k: obralis_core::stock::MovementKind) -> Self {
        match k {
            obralis_core::stock::MovementKind::Inbound => Self::Inbound,
            obralis_core::stock::MovementKind::Outbound => Self::Outbound,
            obralis_core::stock::MovementKind::Adjustment => Self::Adjustment,
        }
    }
}
