//! Billing rules: bill status derivation and payment validation.
//!
//! A bill is either a client bill (money owed to the organization) or
//! a provider bill (money the organization owes). Its status is never
//! stored authoritatively by callers; it is derived from the total of
//! live payments against it and recomputed whenever a payment is
//! created, updated or deleted.

use rust_decimal::Decimal;
use thiserror::Error;

/// Which side of the ledger a bill sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillKind {
    /// Issued to a client; payments against it are collections.
    Client,
    /// Received from a provider; payments against it are expenses.
    Provider,
}

impl BillKind {
    /// Stable string form used in storage and API payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Provider => "provider",
        }
    }
}

impl std::str::FromStr for BillKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "provider" => Ok(Self::Provider),
            other => Err(format!("unknown bill kind: {other}")),
        }
    }
}

/// Derived settlement state of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    /// No live payments.
    Pending,
    /// Paid total is positive but below the bill total.
    PartiallyPaid,
    /// Paid total equals the bill total.
    Paid,
}

impl BillStatus {
    /// Stable string form used in storage and API payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::PartiallyPaid => "partially_paid",
            Self::Paid => "paid",
        }
    }
}

impl std::str::FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "partially_paid" => Ok(Self::PartiallyPaid),
            "paid" => Ok(Self::Paid),
            other => Err(format!("unknown bill status: {other}")),
        }
    }
}

/// Billing rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BillingError {
    /// Payment amount must be strictly positive.
    #[error("payment amount must be positive")]
    NonPositiveAmount,
    /// Payment would push the paid total past the bill total.
    #[error("payment of {amount} exceeds outstanding balance of {outstanding}")]
    Overpayment {
        /// Amount of the rejected payment.
        amount: Decimal,
        /// Remaining unpaid portion of the bill.
        outstanding: Decimal,
    },
    /// Payments against a bill must use the bill's currency.
    #[error("payment currency {payment} does not match bill currency {bill}")]
    CurrencyMismatch {
        /// Currency of the rejected payment.
        payment: String,
        /// Currency of the bill.
        bill: String,
    },
}

/// Derives a bill's status from its total and the sum of live payments.
#[must_use]
pub fn derive_status(bill_total: Decimal, paid_total: Decimal) -> BillStatus {
    if paid_total <= Decimal::ZERO {
        BillStatus::Pending
    } else if paid_total < bill_total {
        BillStatus::PartiallyPaid
    } else {
        BillStatus::Paid
    }
}

/// Validates a new or changed payment amount against the bill.
///
/// `paid_total` is the sum of live payments excluding the payment being
/// validated, so the same check works for create and update.
pub fn validate_payment(
    bill_total: Decimal,
    paid_total: Decimal,
    amount: Decimal,
) -> Result<(), BillingError> {
    if amount <= Decimal::ZERO {
        return Err(BillingError::NonPositiveAmount);
    }
    let outstanding = bill_total - paid_total;
    if amount > outstanding {
        return Err(BillingError::Overpayment {
            amount,
            outstanding,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_pending_when_unpaid() {
        assert_eq!(derive_status(dec!(100), Decimal::ZERO), BillStatus::Pending);
    }

    #[test]
    fn test_status_partially_paid() {
        assert_eq!(
            derive_status(dec!(100), dec!(40)),
            BillStatus::PartiallyPaid
        );
    }

    #[test]
    fn test_status_paid_at_exact_total() {
        assert_eq!(derive_status(dec!(100), dec!(100)), BillStatus::Paid);
    }

    #[test]
    fn test_payment_fills_outstanding_exactly() {
        assert!(validate_payment(dec!(100), dec!(60), dec!(40)).is_ok());
    }

    #[test]
    fn test_overpayment_rejected() {
        let err = validate_payment(dec!(100), dec!(60), dec!(40.01)).unwrap_err();
        assert_eq!(
            err,
            BillingError::Overpayment {
                amount: dec!(40.01),
                outstanding: dec!(40),
            }
        );
    }

    #[test]
    fn test_zero_and_negative_amounts_rejected() {
        assert_eq!(
            validate_payment(dec!(100), Decimal::ZERO, Decimal::ZERO),
            Err(BillingError::NonPositiveAmount)
        );
        assert_eq!(
            validate_payment(dec!(100), Decimal::ZERO, dec!(-5)),
            Err(BillingError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_update_revalidates_against_remaining_total() {
        // Bill of 100 with another live payment of 80: an amended
        // payment may be at most 20.
        assert!(validate_payment(dec!(100), dec!(80), dec!(20)).is_ok());
        assert!(validate_payment(dec!(100), dec!(80), dec!(21)).is_err());
    }
}
