//! Type-safe price representation using decimal arithmetic.
//!
//! The commerce API quotes everything in Vietnamese dong, which has no minor
//! unit in practice, so a `Price` is a whole-dong `Decimal`. Arithmetic stays
//! in `Decimal` to avoid float drift when summing cart subtotals.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Vietnamese dong.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole-dong amount.
    #[must_use]
    pub fn from_dong(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, e.g. to compute a line subtotal.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        self.times(rhs)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    /// Format with thousands separators and the dong sign, e.g. `199.000 ₫`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0.trunc().to_string();
        let (sign, digits) = whole
            .strip_prefix('-')
            .map_or(("", whole.as_str()), |rest| ("-", rest));

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        let offset = digits.len() % 3;
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (i + 3 - offset) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }

        write!(f, "{sign}{grouped} ₫")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_thousands_grouping() {
        assert_eq!(Price::from_dong(0).to_string(), "0 ₫");
        assert_eq!(Price::from_dong(999).to_string(), "999 ₫");
        assert_eq!(Price::from_dong(30_000).to_string(), "30.000 ₫");
        assert_eq!(Price::from_dong(199_000).to_string(), "199.000 ₫");
        assert_eq!(Price::from_dong(1_234_567).to_string(), "1.234.567 ₫");
    }

    #[test]
    fn test_times_and_sum() {
        let line_a = Price::from_dong(199_000).times(2);
        let line_b = Price::from_dong(499_000).times(1);
        assert_eq!(line_a, Price::from_dong(398_000));

        let total: Price = [line_a, line_b].into_iter().sum();
        assert_eq!(total, Price::from_dong(897_000));
    }

    #[test]
    fn test_deserialize_from_json_number() {
        let price: Price = serde_json::from_str("199000").expect("deserialize");
        assert_eq!(price, Price::from_dong(199_000));
    }
}
