use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Rounds an amount to whole cents, halves away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A currency amount that always carries exactly two decimal places.
///
/// Displays as `$1234.50`; serializes as the plain decimal string so JSON
/// consumers never see binary floating point.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub fn new(amount: Decimal) -> Self {
        let mut rounded = round_currency(amount);
        rounded.rescale(2);
        Self(rounded)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl fmt::Debug for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Money({})", self.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_sign_negative() && !self.0.is_zero() {
            write!(f, "-${}", self.0.abs())
        } else {
            write!(f, "${}", self.0)
        }
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Money::new(dec!(500)).to_string(), "$500.00");
        assert_eq!(Money::new(dec!(40.5)).to_string(), "$40.50");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(round_currency(dec!(12.345)), dec!(12.35));
        assert_eq!(round_currency(dec!(12.344)), dec!(12.34));
        assert_eq!(Money::new(dec!(-0.005)).to_string(), "-$0.01");
    }

    #[test]
    fn test_serializes_as_decimal_string() {
        let json = serde_json::to_string(&Money::new(dec!(603.75))).unwrap();
        assert_eq!(json, "\"603.75\"");
    }

    #[test]
    fn test_deserialize_rounds_to_cents() {
        let money: Money = serde_json::from_str("\"140.255\"").unwrap();
        assert_eq!(money.to_string(), "$140.26");
    }
}
