//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    12.99 * 3 = 38.970000000000006  ❌ WRONG!                            │
//! │                                                                         │
//! │  Summing a cart of such lines drifts a little further every time.      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1299 cents * 3 = 3897 cents, always                                 │
//! │    Sum first in cents, format for display last                         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use forkful_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1299); // $12.99
//!
//! // Arithmetic operations
//! let line_total = price.multiply_quantity(3); // $38.97
//! let total = line_total + Money::from_cents(699); // $45.96
//! assert_eq!(total.to_string(), "$45.96");
//!
//! // Catalog prices arrive as decimal text and are parsed exactly
//! let parsed: Money = "12.99".parse().unwrap();
//! assert_eq!(parsed, price);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Room for refunds and adjustments in display code
/// - **Saturating arithmetic**: Sums and line totals clamp at the `i64`
///   bounds instead of wrapping or panicking
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Serializes as the bare cent count
///
/// ## Where Money is Used
/// ```text
/// MenuItem.price ──► CartLine.unit_price ──► CartLine::line_total
///                                                  │
///                 RestaurantGroup.subtotal ◄───────┤
///                          │                       │
///                          ▼                       ▼
///                 Order.total_amount         CartStore::total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use forkful_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    ///
    /// ## Example
    /// ```rust
    /// use forkful_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).cents_part(), 99);
    /// assert_eq!(Money::from_cents(-550).cents_part(), 50);
    /// ```
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use forkful_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(699); // Cheese Fries $6.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 2097); // $20.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses decimal text such as `"12.99"`, `"8"` or `"0.5"` into cents.
///
/// The conversion is done on the digits themselves, so `"0.1"` is exactly
/// 10 cents. More than two fractional digits, signs and currency symbols
/// are rejected; prices in the catalog are never negative.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = |reason: &str| ValidationError::invalid_format("amount", reason);

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal point"));
        }
        if s.contains('.') && frac.is_empty() {
            return Err(invalid("expected digits after the decimal point"));
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("expected at most two digits after the decimal point"));
        }

        let whole: i64 = whole
            .parse()
            .map_err(|_| invalid("amount is too large"))?;
        let frac: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("bad cents"))? * 10,
            _ => frac.parse().map_err(|_| invalid("bad cents"))?,
        };

        whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac))
            .map(Money)
            .ok_or_else(|| invalid("amount is too large"))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// The client's `ConfigState::format_currency` honours the configured
/// currency symbol; this is the `$` default.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Multiplication by a cart quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summing an iterator of Money values (cart and group totals).
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
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
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let huge = Money::from_cents(i64::MAX / 2);

        assert_eq!(huge.multiply_quantity(3).cents(), i64::MAX);
        assert_eq!((huge + huge + huge).cents(), i64::MAX);

        let mut running = huge;
        running += huge;
        running += huge;
        assert_eq!(running.cents(), i64::MAX);

        let total: Money = std::iter::repeat(huge).take(4).sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1299, 699, 599].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 2597);

        let empty: Money = std::iter::empty().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_parse_decimal_text() {
        assert_eq!("12.99".parse::<Money>().unwrap().cents(), 1299);
        assert_eq!("8".parse::<Money>().unwrap().cents(), 800);
        assert_eq!("0.5".parse::<Money>().unwrap().cents(), 50);
        assert_eq!(" 3.05 ".parse::<Money>().unwrap().cents(), 305);
        assert_eq!("0.1".parse::<Money>().unwrap().cents(), 10);
    }

    #[test]
    fn test_parse_rejects_malformed_amounts() {
        assert!("".parse::<Money>().is_err());
        assert!("-1.00".parse::<Money>().is_err());
        assert!("$5".parse::<Money>().is_err());
        assert!("1.999".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        assert!("1.x0".parse::<Money>().is_err());
        assert!("1.".parse::<Money>().is_err());
        assert!("12.".parse::<Money>().is_err());
    }

    /// Repeated float addition drifts; cents do not.
    #[test]
    fn test_no_drift_across_repeated_sums() {
        let dime = Money::from_cents(10);
        let total: Money = std::iter::repeat(dime).take(1000).sum();
        assert_eq!(total.cents(), 10_000);
    }
}
