//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    5.94 × 1.09 = 6.474600000000001  ❌ rounding depends on noise        │
//! │                                                                         │
//! │  Invoices multiply by rates with two decimals (VAT 0.22, USD 1.09),     │
//! │  so integer cents would force rounding before conversion.               │
//! │                                                                         │
//! │  OUR SOLUTION: exact decimals (rust_decimal)                            │
//! │    5.94 × 1.09 = 6.4746 exactly → rounds to 6.47                        │
//! │    Intermediate values stay exact until the final conversion step       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::money::Money;
//!
//! let price = Money::new(Decimal::new(1000, 2));  // 10.00
//! let subtotal = price.multiply_quantity(3).unwrap(); // 30.00
//! assert_eq!(subtotal.to_string(), "30.00");
//! ```
//!
//! Arithmetic is checked: an amount past `Decimal::MAX` comes back as
//! `CoreError::AmountOverflow` rather than a panic.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in major units (euros, pounds, dollars).
///
/// ## Design Decisions
/// - **Decimal (exact)**: VAT and FX rates multiply without float noise
/// - **No currency tag**: the currency travels next to the amount
///   (`OrderLine::currency`), matching the flat ledger row
/// - **Rounding is explicit**: only [`Money::round_dp`] changes precision
///
/// ## Where Money is Used
/// ```text
/// StockItem.unit_price ──► subtotal ──► discount ──► gross ──► VAT ──► net
///                                                                   │
///                   convert_currency(round half-to-even, 2 dp) ◄────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Rounds to `dp` decimal places using Bankers Rounding.
    ///
    /// ## Bankers Rounding Explained
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  BANKERS ROUNDING (Round Half to Even)                              │
    /// │                                                                     │
    /// │  Standard rounding always rounds 0.5 UP, causing systematic bias:  │
    /// │    0.125 → 0.13, 0.135 → 0.14 (always up = +bias)                   │
    /// │                                                                     │
    /// │  Bankers Rounding rounds 0.5 to nearest EVEN digit:                │
    /// │    0.125 → 0.12, 0.135 → 0.14 (alternates = no bias)               │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// The result always carries exactly `dp` places, so `0` renders as
    /// `0.00` and `10.9` as `10.90`.
    pub fn round_dp(&self, dp: u32) -> Money {
        let mut rounded = self
            .0
            .round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(dp);
        Money(rounded)
    }

    /// Multiplies by a rate (VAT, discount percentage, FX rate). Unrounded.
    pub fn scale(&self, rate: Decimal) -> CoreResult<Money> {
        self.0
            .checked_mul(rate)
            .map(Money)
            .ok_or(CoreError::AmountOverflow { operation: "scale" })
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::new(Decimal::new(299, 2)); // 2.99
    /// assert_eq!(unit_price.multiply_quantity(3).unwrap().amount(), Decimal::new(897, 2));
    /// ```
    pub fn multiply_quantity(&self, qty: i64) -> CoreResult<Money> {
        self.0
            .checked_mul(Decimal::from(qty))
            .map(Money)
            .ok_or(CoreError::AmountOverflow {
                operation: "multiply by quantity",
            })
    }

    pub fn checked_add(&self, other: Money) -> CoreResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or(CoreError::AmountOverflow { operation: "add" })
    }

    pub fn checked_sub(&self, other: Money) -> CoreResult<Money> {
        self.0
            .checked_sub(other.0)
            .map(Money)
            .ok_or(CoreError::AmountOverflow { operation: "subtract" })
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount as stored. Pricing output is always rescaled to two
/// places, so invoice values print as `32.94`, `0.00`, etc.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_dp_half_to_even() {
        assert_eq!(Money::new(dec!(0.125)).round_dp(2).amount(), dec!(0.12));
        assert_eq!(Money::new(dec!(0.135)).round_dp(2).amount(), dec!(0.14));
        assert_eq!(Money::new(dec!(6.4746)).round_dp(2).amount(), dec!(6.47));
        assert_eq!(Money::new(dec!(35.9046)).round_dp(2).amount(), dec!(35.90));
    }

    #[test]
    fn test_round_dp_fixes_scale() {
        assert_eq!(Money::zero().round_dp(2).to_string(), "0.00");
        assert_eq!(Money::new(dec!(10.9)).round_dp(2).to_string(), "10.90");
        assert_eq!(Money::new(dec!(3)).round_dp(2).to_string(), "3.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(dec!(10.00));
        let b = Money::new(dec!(2.50));

        assert_eq!(a.checked_add(b).unwrap().amount(), dec!(12.50));
        assert_eq!(a.checked_sub(b).unwrap().amount(), dec!(7.50));
        assert_eq!(a.multiply_quantity(3).unwrap().amount(), dec!(30.00));
        assert_eq!(a.scale(dec!(0.22)).unwrap().amount(), dec!(2.2));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = Money::new(Decimal::MAX);

        assert!(matches!(
            huge.multiply_quantity(2),
            Err(CoreError::AmountOverflow { .. })
        ));
        assert!(matches!(
            huge.scale(dec!(1.09)),
            Err(CoreError::AmountOverflow { .. })
        ));
        assert!(matches!(
            huge.checked_add(Money::new(dec!(1))),
            Err(CoreError::AmountOverflow { .. })
        ));
        assert!(matches!(
            Money::new(Decimal::MIN).checked_sub(Money::new(dec!(1))),
            Err(CoreError::AmountOverflow { .. })
        ));
        assert_eq!(huge.multiply_quantity(1).unwrap(), huge);
    }

    #[test]
    fn test_parse() {
        assert_eq!(" 10.5 ".parse::<Money>().unwrap().amount(), dec!(10.5));
        assert!("ten".parse::<Money>().is_err());
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_negative());
        assert!(Money::new(dec!(-1.00)).is_negative());
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(32.94))).unwrap();
        assert_eq!(json, "\"32.94\"");
    }
}
