//! # Money Module
//!
//! Provides the `Money` type used for overdue charges.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A patron 3 days late at 0.25/day:                                     │
//! │    3 × 25 cents = 75 cents, exactly, every time                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stacks_core::money::Money;
//!
//! let daily = Money::from_cents(25);               // $0.25
//! let owed = daily.checked_times_days(3).unwrap(); // $0.75
//! assert_eq!(owed.to_string(), "$0.75");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: matches SQLite INTEGER
/// - **Single field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use stacks_core::money::Money;
    ///
    /// let charge = Money::from_cents(125); // Represents $1.25
    /// assert_eq!(charge.cents(), 125);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
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
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies a per-day rate by a number of days.
    ///
    /// `None` if the total does not fit in an i64 of cents.
    ///
    /// ## Example
    /// ```rust
    /// use stacks_core::money::Money;
    ///
    /// let daily = Money::from_cents(25);
    /// assert_eq!(daily.checked_times_days(4).map(|m| m.cents()), Some(100));
    /// assert!(daily.checked_times_days(i64::MAX).is_none());
    /// ```
    #[inline]
    pub const fn checked_times_days(&self, days: i64) -> Option<Self> {
        match self.0.checked_mul(days) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

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

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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
        assert_eq!(Money::from_cents(25).to_string(), "$0.25");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-$5.50");
        assert_eq!(Money::zero().to_string(), "$0.00");
    }

    #[test]
    fn test_daily_rate_arithmetic() {
        let daily = Money::from_cents(25);
        assert_eq!(daily.checked_times_days(0), Some(Money::zero()));
        assert_eq!(daily.checked_times_days(7), Some(Money::from_cents(175)));
        assert_eq!(Money::from_cents(i64::MAX / 2).checked_times_days(3), None);
    }

    #[test]
    fn test_zero() {
        assert!(Money::zero().is_zero());
        assert!(!Money::from_cents(1).is_zero());
        assert_eq!(Money::default(), Money::zero());
    }
}
