//! Payment reference string convention.
//!
//! Treasury transactions created by the billing module carry a
//! reference of the form `BILL-{payment_id}` (payment against a
//! provider bill) or `COLL-{payment_id}` (collection against a client
//! bill). The convention links the two records without a foreign key
//! in either direction.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Parsed payment reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentReference {
    /// Payment against a provider bill.
    BillPayment(Uuid),
    /// Collection against a client bill.
    Collection(Uuid),
}

impl PaymentReference {
    /// The payment id the reference points to.
    #[must_use]
    pub const fn payment_id(&self) -> Uuid {
        match self {
            Self::BillPayment(id) | Self::Collection(id) => *id,
        }
    }
}

impl fmt::Display for PaymentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BillPayment(id) => write!(f, "BILL-{id}"),
            Self::Collection(id) => write!(f, "COLL-{id}"),
        }
    }
}

impl FromStr for PaymentReference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("BILL-") {
            let id = Uuid::parse_str(rest).map_err(|e| format!("invalid reference: {e}"))?;
            return Ok(Self::BillPayment(id));
        }
        if let Some(rest) = s.strip_prefix("COLL-") {
            let id = Uuid::parse_str(rest).map_err(|e| format!("invalid reference: {e}"))?;
            return Ok(Self::Collection(id));
        }
        Err(format!("not a payment reference: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let id = Uuid::new_v4();

        let bill = PaymentReference::BillPayment(id);
        assert_eq!(bill.to_string().parse::<PaymentReference>().unwrap(), bill);

        let coll = PaymentReference::Collection(id);
        assert_eq!(coll.to_string().parse::<PaymentReference>().unwrap(), coll);
    }

    #[test]
    fn test_format() {
        let id = Uuid::nil();
        assert_eq!(
            PaymentReference::BillPayment(id).to_string(),
            format!("BILL-{id}")
        );
        assert_eq!(
            PaymentReference::Collection(id).to_string(),
            format!("COLL-{id}")
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!("TXN-123".parse::<PaymentReference>().is_err());
        assert!("BILL-not-a-uuid".parse::<PaymentReference>().is_err());
        assert!("".parse::<PaymentReference>().is_err());
    }
}
