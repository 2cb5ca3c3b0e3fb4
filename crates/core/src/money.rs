//! Money value object (smallest currency unit).

use serde::{Deserialize, Serialize};

use crate::model::ValueObject;

/// Amount in the smallest currency unit (e.g. centavos).
///
/// Prices are never negative in this domain, so the representation is
/// unsigned. Arithmetic saturates instead of wrapping.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Whole units plus cents, e.g. `Money::new(1_234, 50)` is `1,234.50`.
    pub const fn new(major: u64, cents: u8) -> Self {
        Self(major.saturating_mul(100).saturating_add(cents as u64 % 100))
    }

    pub const fn minor(&self) -> u64 {
        self.0
    }

    /// Price of `quantity` units. Non-positive quantities cost nothing.
    pub fn times(self, quantity: i64) -> Self {
        let quantity = u64::try_from(quantity).unwrap_or(0);
        Self(self.0.saturating_mul(quantity))
    }

    pub fn saturating_add(self, other: Money) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl core::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

impl core::fmt::Display for Money {
    /// Two decimals with thousands separators: `1,234,567.05`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let major = (self.0 / 100).to_string();
        let cents = self.0 % 100;

        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{grouped}.{cents:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Money::from_minor(0).to_string(), "0.00");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(99_999).to_string(), "999.99");
        assert_eq!(Money::new(1_234, 50).to_string(), "1,234.50");
        assert_eq!(Money::from_minor(123_456_705).to_string(), "1,234,567.05");
    }

    #[test]
    fn times_multiplies_and_ignores_negative_quantities() {
        let price = Money::new(12, 50);
        assert_eq!(price.times(3), Money::from_minor(3_750));
        assert_eq!(price.times(0), Money::ZERO);
        assert_eq!(price.times(-2), Money::ZERO);
    }

    #[test]
    fn arithmetic_saturates() {
        let max = Money::from_minor(u64::MAX);
        assert_eq!(max.times(2), max);
        assert_eq!(max.saturating_add(Money::from_minor(1)), max);
    }

    #[test]
    fn sum_adds_all_amounts() {
        let total: Money = [100, 250, 5].into_iter().map(Money::from_minor).sum();
        assert_eq!(total, Money::from_minor(355));
    }
}
