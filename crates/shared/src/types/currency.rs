//! Currency codes.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are carried as `rust_decimal::Decimal` everywhere.

use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro
    Eur,
    /// US Dollar
    Usd,
    /// Argentine Peso
    Ars,
    /// Brazilian Real
    Brl,
    /// Chilean Peso
    Clp,
    /// Uruguayan Peso
    Uyu,
}

impl Currency {
    /// Stable string form used in storage and API payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Ars => "ARS",
            Self::Brl => "BRL",
            Self::Clp => "CLP",
            Self::Uyu => "UYU",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EUR" => Ok(Self::Eur),
            "USD" => Ok(Self::Usd),
            "ARS" => Ok(Self::Ars),
            "BRL" => Ok(Self::Brl),
            "CLP" => Ok(Self::Clp),
            "UYU" => Ok(Self::Uyu),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Eur.to_string(), "EUR");
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Ars.to_string(), "ARS");
        assert_eq!(Currency::Brl.to_string(), "BRL");
        assert_eq!(Currency::Clp.to_string(), "CLP");
        assert_eq!(Currency::Uyu.to_string(), "UYU");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("EUR").unwrap(), Currency::Eur);
        assert_eq!(Currency::from_str("eur").unwrap(), Currency::Eur);
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("UYU").unwrap(), Currency::Uyu);

        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_currency_round_trips_as_str() {
        for currency in [
            Currency::Eur,
            Currency::Usd,
            Currency::Ars,
            Currency::Brl,
            Currency::Clp,
            Currency::Uyu,
        ] {
            assert_eq!(Currency::from_str(currency.as_str()).unwrap(), currency);
        }
    }
}
