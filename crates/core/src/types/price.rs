//! Whole-đồng money amounts.
//!
//! Vietnamese đồng has no minor unit in circulation, so every fee and total
//! is an integer number of đồng.

use core::fmt;
use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// An amount of Vietnamese đồng.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Vnd(i64);

impl Vnd {
    /// Zero đồng.
    pub const ZERO: Self = Self(0);

    /// Create an amount from whole đồng.
    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    /// The amount in whole đồng.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// The amount as a float, for multiplication by distances.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Fees stay far below 2^52 đồng
    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Add for Vnd {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Vnd {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl From<i64> for Vnd {
    fn from(amount: i64) -> Self {
        Self(amount)
    }
}

/// Formats with thousands separators, e.g. `65,000 VND`.
impl fmt::Display for Vnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if self.0 < 0 {
            write!(f, "-{grouped} VND")
        } else {
            write!(f, "{grouped} VND")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Vnd::new(65_000).to_string(), "65,000 VND");
        assert_eq!(Vnd::new(1_234_567).to_string(), "1,234,567 VND");
        assert_eq!(Vnd::new(500).to_string(), "500 VND");
        assert_eq!(Vnd::ZERO.to_string(), "0 VND");
        assert_eq!(Vnd::new(-15_000).to_string(), "-15,000 VND");
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(Vnd::new(15_000) + Vnd::new(50_000), Vnd::new(65_000));
        assert_eq!(Vnd::new(65_000) - Vnd::new(15_000), Vnd::new(50_000));
    }
}
