//! Decimal price representation.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// A product price in Korean won.
///
/// Stored as a decimal to match the hosted platform's `numeric` column; won
/// has no minor unit, so display formatting rounds to whole units with
/// thousands separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Wrap a raw decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The raw decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this price is zero (a free product).
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.0.is_zero()
    }

    /// The whole-won amount, truncating any fractional part.
    #[must_use]
    pub fn as_won(&self) -> i64 {
        self.0.trunc().to_i64().unwrap_or(0)
    }

    /// Format for display, e.g. `9,900 KRW` or `Free`.
    #[must_use]
    pub fn display(&self) -> String {
        if self.is_free() {
            return "Free".to_owned();
        }
        format!("{} KRW", group_thousands(self.as_won()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Insert `,` separators every three digits.
fn group_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    let first_group = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first_group) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_free() {
        assert!(Price::new(Decimal::ZERO).is_free());
        assert!(!Price::new(Decimal::from(9900)).is_free());
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::new(Decimal::from(9900)).display(), "9,900 KRW");
        assert_eq!(Price::new(Decimal::from(129_000)).display(), "129,000 KRW");
        assert_eq!(Price::new(Decimal::from(100)).display(), "100 KRW");
    }

    #[test]
    fn test_display_free() {
        assert_eq!(Price::new(Decimal::ZERO).display(), "Free");
    }

    #[test]
    fn test_serde_transparent() {
        let price = Price::new(Decimal::from(9900));
        let json = serde_json::to_string(&price).unwrap();
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, back);
    }
}
