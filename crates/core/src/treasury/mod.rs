//! Treasury domain types: cash boxes, bank accounts, and transactions.

pub mod check;
pub mod reference;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::balance::Direction;
pub use check::{CheckError, CheckKind, CheckStatus};
pub use reference::PaymentReference;

/// Kind of treasury account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreasuryAccountKind {
    /// Physical cash box at a site or office.
    CashBox,
    /// Bank account.
    BankAccount,
}

/// Treasury validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreasuryError {
    /// Transaction amount is zero.
    #[error("Transaction amount cannot be zero")]
    ZeroAmount,

    /// Transaction amount is negative.
    #[error("Transaction amount cannot be negative")]
    NegativeAmount,

    /// Treasury account is inactive.
    #[error("Treasury account is inactive")]
    AccountInactive,

    /// Transfer legs reference the same account.
    #[error("Cannot transfer between the same treasury account")]
    TransferSameAccount,

    /// Transfer legs use different currencies.
    #[error("Transfer legs must share a currency")]
    TransferCurrencyMismatch,
}

/// Validates the amount of a treasury transaction.
///
/// Amounts are stored positive; the direction carries the sign.
///
/// # Errors
///
/// Returns an error for zero or negative amounts.
pub fn validate_amount(amount: Decimal) -> Result<(), TreasuryError> {
    if amount.is_zero() {
        return Err(TreasuryError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(TreasuryError::NegativeAmount);
    }
    Ok(())
}

/// Validates a transfer between two treasury accounts.
///
/// A transfer is persisted as an expense leg on the source account and
/// an income leg on the destination, sharing a transfer group id.
///
/// # Errors
///
/// Returns an error if the legs are invalid as a pair.
pub fn validate_transfer(
    from_account: uuid::Uuid,
    to_account: uuid::Uuid,
    same_currency: bool,
    amount: Decimal,
) -> Result<(), TreasuryError> {
    validate_amount(amount)?;
    if from_account == to_account {
        return Err(TreasuryError::TransferSameAccount);
    }
    if !same_currency {
        return Err(TreasuryError::TransferCurrencyMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(dec!(10)).is_ok());
        assert_eq!(validate_amount(dec!(0)), Err(TreasuryError::ZeroAmount));
        assert_eq!(
            validate_amount(dec!(-5)),
            Err(TreasuryError::NegativeAmount)
        );
    }

    #[test]
    fn test_validate_transfer() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(validate_transfer(a, b, true, dec!(100)).is_ok());
        assert_eq!(
            validate_transfer(a, a, true, dec!(100)),
            Err(TreasuryError::TransferSameAccount)
        );
        assert_eq!(
            validate_transfer(a, b, false, dec!(100)),
            Err(TreasuryError::TransferCurrencyMismatch)
        );
        assert_eq!(
            validate_transfer(a, b, true, dec!(0)),
            Err(TreasuryError::ZeroAmount)
        );
    }
}
