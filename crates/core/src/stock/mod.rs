//! Stock movement rules.
//!
//! Each stock item carries a denormalized on-hand quantity maintained
//! incrementally from its movements, with the same
//! revert-old-then-apply-new discipline the treasury balances use.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received; increases on-hand quantity.
    Inbound,
    /// Goods consumed or shipped; decreases on-hand quantity.
    Outbound,
    /// Manual correction; quantity is applied as signed.
    Adjustment,
}

impl MovementKind {
    /// Stable string form used in storage and API payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
            Self::Adjustment => "adjustment",
        }
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            "adjustment" => Ok(Self::Adjustment),
            other => Err(format!("unknown movement kind: {other}")),
        }
    }
}

/// Stock rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    /// Inbound and outbound quantities must be strictly positive.
    #[error("movement quantity must be positive")]
    NonPositiveQuantity,
    /// Adjustments of zero change nothing.
    #[error("adjustment quantity must be non-zero")]
    ZeroAdjustment,
    /// The movement would drive on-hand quantity below zero.
    #[error("movement would leave {resulting} on hand")]
    NegativeStock {
        /// On-hand quantity the movement would produce.
        resulting: Decimal,
    },
}

/// Signed on-hand delta of a movement.
///
/// # Errors
///
/// Returns an error for non-positive inbound/outbound quantities or a
/// zero adjustment.
pub fn signed_delta(kind: MovementKind, quantity: Decimal) -> Result<Decimal, StockError> {
    match kind {
        MovementKind::Inbound | MovementKind::Outbound if quantity <= Decimal::ZERO => {
            Err(StockError::NonPositiveQuantity)
        }
        MovementKind::Adjustment if quantity == Decimal::ZERO => Err(StockError::ZeroAdjustment),
        MovementKind::Inbound | MovementKind::Adjustment => Ok(quantity),
        MovementKind::Outbound => Ok(-quantity),
    }
}

/// On-hand quantity after reverting an old movement delta and applying
/// a new one, rejecting results below zero.
///
/// Create passes `old_delta = 0`; delete passes `new_delta = 0`.
///
/// # Errors
///
/// Returns an error if the resulting quantity would be negative.
pub fn apply_movement_change(
    on_hand: Decimal,
    old_delta: Decimal,
    new_delta: Decimal,
) -> Result<Decimal, StockError> {
    let resulting = on_hand - old_delta + new_delta;
    if resulting < Decimal::ZERO {
        return Err(StockError::NegativeStock { resulting });
    }
    Ok(resulting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_delta_by_kind() {
        assert_eq!(signed_delta(MovementKind::Inbound, dec!(5)), Ok(dec!(5)));
        assert_eq!(signed_delta(MovementKind::Outbound, dec!(5)), Ok(dec!(-5)));
        assert_eq!(
            signed_delta(MovementKind::Adjustment, dec!(-2.5)),
            Ok(dec!(-2.5))
        );
    }

    #[test]
    fn test_non_positive_quantities_rejected() {
        assert_eq!(
            signed_delta(MovementKind::Inbound, Decimal::ZERO),
            Err(StockError::NonPositiveQuantity)
        );
        assert_eq!(
            signed_delta(MovementKind::Outbound, dec!(-1)),
            Err(StockError::NonPositiveQuantity)
        );
        assert_eq!(
            signed_delta(MovementKind::Adjustment, Decimal::ZERO),
            Err(StockError::ZeroAdjustment)
        );
    }

    #[test]
    fn test_create_and_delete_are_special_cases() {
        // Create: no old delta to revert.
        assert_eq!(
            apply_movement_change(dec!(10), Decimal::ZERO, dec!(5)),
            Ok(dec!(15))
        );
        // Delete: no new delta to apply.
        assert_eq!(
            apply_movement_change(dec!(10), dec!(-4), Decimal::ZERO),
            Ok(dec!(14))
        );
    }

    #[test]
    fn test_update_reverts_then_applies() {
        // Outbound of 4 amended to outbound of 7 against 10 on hand.
        assert_eq!(
            apply_movement_change(dec!(6), dec!(-4), dec!(-7)),
            Ok(dec!(3))
        );
    }

    #[test]
    fn test_negative_stock_rejected() {
        assert_eq!(
            apply_movement_change(dec!(3), Decimal::ZERO, dec!(-5)),
            Err(StockError::NegativeStock {
                resulting: dec!(-2)
            })
        );
    }

    #[test]
    fn test_deleting_inbound_can_go_negative_and_is_rejected() {
        // 2 on hand, deleting an inbound of 5 would leave -3.
        assert_eq!(
            apply_movement_change(dec!(2), dec!(5), Decimal::ZERO),
            Err(StockError::NegativeStock {
                resulting: dec!(-3)
            })
        );
    }
}
