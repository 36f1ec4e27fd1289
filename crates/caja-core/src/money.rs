//! # Money Module
//!
//! Monetary values as integer cents.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  A register that accumulates hundreds of line items per day drifts.     │
//! │                                                                         │
//! │  OUR SOLUTION: integer cents (i64)                                      │
//! │    Totals, prices, commissions - all exact integer arithmetic.          │
//! │    The only float in the money path is the exchange rate, and the       │
//! │    converted local amount is a derived display/report column that is    │
//! │    never summed back into base-currency accounting.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both currencies flow through [`Money`]: sale/return totals are USD cents,
//! advance/recharge amounts are local-currency cents. The two never mix in
//! a single column or computation - conversion always goes through an
//! explicit exchange rate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::CommissionRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents), signed.
///
/// ## Design Decisions
/// - **i64 (signed)**: returns subtract from period totals
/// - **Single-field tuple struct**: zero-cost wrapper over i64
/// - **Currency-agnostic**: the surrounding column/context fixes the
///   currency; see the module docs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major-unit portion (dollars or bolívars).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion, always 0-99.
    #[inline]
    pub const fn minor_part(&self) -> i64 {
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

    /// Absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies by a line quantity.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates the commission owed on this amount.
    ///
    /// Integer math with round-half-up: `(cents * bps + 5000) / 10000`.
    /// i128 intermediate prevents overflow on large local-currency amounts.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    /// use caja_core::types::CommissionRate;
    ///
    /// let principal = Money::from_cents(10_000);     // 100.00
    /// let fee = principal.commission(CommissionRate::from_bps(2000));
    /// assert_eq!(fee.cents(), 2_000);                // 20.00
    /// ```
    pub fn commission(&self, rate: CommissionRate) -> Money {
        let fee = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(fee as i64)
    }

    /// Converts a base-currency amount to local currency at the given rate.
    ///
    /// The result is a display/report figure, not an accounting value - it
    /// stays `f64`, mirroring the REAL column it lands in.
    ///
    /// ## Example
    /// ```rust
    /// use caja_core::money::Money;
    ///
    /// let total = Money::from_cents(1050); // $10.50
    /// assert!((total.to_local(36.5) - 383.25).abs() < 1e-9);
    /// ```
    #[inline]
    pub fn to_local(&self, rate: f64) -> f64 {
        (self.0 as f64 / 100.0) * rate
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering without a currency symbol. UI-facing strings go
/// through [`crate::format::format_amount`], which knows the locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
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
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
