//! # Money Module
//!
//! Provides the `Money` type for prices and cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A product at R$ 4.99 with 15% off, times 3 units, summed with other   │
//! │  lines in floating point drifts by fractions of a centavo. After a few │
//! │  add/remove cycles the cart total no longer matches the line totals.   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centavos                                         │
//! │    Discount is rounded ONCE, when the final price is computed.          │
//! │    Every total after that is exact integer addition.                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use market_core::money::Money;
//!
//! let price = Money::from_cents(499); // R$ 4.99
//! let line = price * 3;               // R$ 14.97
//! assert_eq!(line.cents(), 1497);
//!
//! let discounted = price.apply_discount_percent(10);
//! assert_eq!(discounted.cents(), 449);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Currency symbol used by `Display`.
pub const CURRENCY_SYMBOL: &str = "R$";

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos (the smallest unit of the Brazilian real).
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.price ──► apply_discount_percent ──► PricedProduct.final_price │
/// │                                                    │                    │
/// │                                                    ▼                    │
/// │                          CartLine.line_total = final_price × quantity   │
/// │                                                    │                    │
/// │                                                    ▼                    │
/// │                               Cart.total_amount = Σ line_total          │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    ///
    /// ## Example
    /// ```rust
    /// use market_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // R$ 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -R$ 5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-reais portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the centavos portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a line quantity, saturating at the i64
    /// bounds.
    ///
    /// ## Example
    /// ```rust
    /// use market_core::money::Money;
    ///
    /// let unit = Money::from_cents(299);
    /// assert_eq!(unit.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies a unit price by a line quantity, `None` on overflow.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Applies a percentage discount (0-100) and returns the discounted price.
    ///
    /// The discount amount is rounded half-up to the centavo:
    /// `(amount × percent + 50) / 100`.
    ///
    /// ## Example
    /// ```rust
    /// use market_core::money::Money;
    ///
    /// let price = Money::from_cents(1000);
    /// assert_eq!(price.apply_discount_percent(15).cents(), 850);
    /// assert_eq!(price.apply_discount_percent(0).cents(), 1000);
    /// assert_eq!(price.apply_discount_percent(100).cents(), 0);
    /// ```
    pub fn apply_discount_percent(&self, percent: u8) -> Money {
        // i128 keeps large catalog prices from overflowing mid-calculation
        let discount = (self.0 as i128 * percent as i128 + 50) / 100;
        Money(self.0 - discount as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug/log formatting. The UI formats through `SessionConfig::format_currency`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{} {}.{:02}",
            sign,
            CURRENCY_SYMBOL,
            self.major().abs(),
            self.minor()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        // saturates so a huge cart reads as the largest amount, never panics
        iter.fold(Money::zero(), |acc, m| Money(acc.0.saturating_add(m.0)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "R$ 10.99");
        assert_eq!(Money::from_cents(500).to_string(), "R$ 5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$ 5.50");
        assert_eq!(Money::zero().to_string(), "R$ 0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(250);

        assert_eq!((a + b).cents(), 1250);
        assert_eq!((a - b).cents(), 750);
        assert_eq!((a * 3).cents(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(50);
        assert_eq!(c.cents(), 1200);
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 999 × 15% = 149.85 → 150 off
        assert_eq!(Money::from_cents(999).apply_discount_percent(15).cents(), 849);
        // 5 × 10% = 0.5 → 1 off
        assert_eq!(Money::from_cents(5).apply_discount_percent(10).cents(), 4);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, 1]
            .into_iter()
            .map(Money::from_cents)
            .sum();
        assert_eq!(total.cents(), 351);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_large_amounts_saturate() {
        let unit = Money::from_cents(1_000_000);
        assert_eq!(unit.multiply_quantity(10_000_000_000_000).cents(), i64::MAX);
        assert_eq!(unit.checked_multiply_quantity(10_000_000_000_000), None);
        assert_eq!(unit.checked_multiply_quantity(3), Some(Money::from_cents(3_000_000)));

        let total: Money = [Money::from_cents(i64::MAX), Money::from_cents(1)]
            .into_iter()
            .sum();
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_cents(1).is_positive());
        assert!(Money::from_cents(-1).is_negative());
        assert!(!Money::from_cents(-1).is_positive());
    }
}
