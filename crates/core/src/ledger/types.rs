//! Domain types for the chart of accounts and journal entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Journal line side: either Debit or Credit.
///
/// In double-entry bookkeeping:
/// - Debits increase asset/expense accounts, decrease liability/equity/revenue accounts
/// - Credits decrease asset/expense accounts, increase liability/equity/revenue accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalSide {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

impl JournalSide {
    /// The opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }

    /// Stable string form used in storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl std::str::FromStr for JournalSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(format!("unknown journal side: {other}")),
        }
    }
}

/// Top-level classification of a ledger account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    /// Resources owned by the organization.
    Asset,
    /// Obligations owed to others.
    Liability,
    /// Residual interest of the owners.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// The side on which this account type normally carries its balance.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// True for accounts reported on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(&self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Stable string form used in storage and API payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown account type: {other}")),
        }
    }
}

/// Which side increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalBalance {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl NormalBalance {
    /// Signed balance of an account from its debit and credit totals,
    /// expressed in the account's normal direction.
    #[must_use]
    pub fn balance(&self, debits: Decimal, credits: Decimal) -> Decimal {
        match self {
            Self::Debit => debits - credits,
            Self::Credit => credits - debits,
        }
    }
}

/// Input for a single line of a journal entry.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalLineInput {
    /// The ledger account to post to.
    pub account_id: Uuid,
    /// Whether this line debits or credits the account.
    pub side: JournalSide,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Optional memo for this line.
    pub memo: Option<String>,
}

/// Input for creating a journal entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewJournalEntry {
    /// The entry date.
    pub entry_date: NaiveDate,
    /// Description of the entry.
    pub description: String,
    /// The lines (must have at least two, and balance).
    pub lines: Vec<JournalLineInput>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_balance_by_type() {
        assert_eq!(AccountType::Asset.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), NormalBalance::Debit);
        assert_eq!(
            AccountType::Liability.normal_balance(),
            NormalBalance::Credit
        );
        assert_eq!(AccountType::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn test_balance_sheet_classification() {
        assert!(AccountType::Asset.is_balance_sheet());
        assert!(AccountType::Liability.is_balance_sheet());
        assert!(AccountType::Equity.is_balance_sheet());
        assert!(!AccountType::Revenue.is_balance_sheet());
        assert!(!AccountType::Expense.is_balance_sheet());
    }

    #[test]
    fn test_signed_balance() {
        assert_eq!(
            NormalBalance::Debit.balance(dec!(100), dec!(30)),
            dec!(70)
        );
        assert_eq!(
            NormalBalance::Credit.balance(dec!(30), dec!(100)),
            dec!(70)
        );
    }

    #[test]
    fn test_side_round_trip() {
        for side in [JournalSide::Debit, JournalSide::Credit] {
            assert_eq!(side.as_str().parse::<JournalSide>().unwrap(), side);
        }
        assert_eq!(JournalSide::Debit.opposite(), JournalSide::Credit);
    }
}
