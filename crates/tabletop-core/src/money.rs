//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer currency units                                   │
//! │    Menu prices, line totals, tax and discounts are whole units.        │
//! │    Tax is the only fractional step and is rounded exactly once.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tabletop_core::money::Money;
//!
//! let price = Money::from_minor(350);
//! let line = price.checked_mul_quantity(2).unwrap();
//! assert_eq!(line.minor(), 700);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit the restaurant bills in.
///
/// ## Design Decisions
/// - **i64 (signed)**: a raw grand total can go negative before validation
/// - **Single field tuple struct**: serializes as a bare JSON number
///
/// ## Where Money is Used
/// ```text
/// MenuItem.price ──► OrderLine.unit_price ──► OrderLine.line_total
///                                                   │
///                    Order.subtotal ◄───────────────┘
///                          │
///                          ├──► Order.tax (rounded once)
///                          ▼
///                    Order.grand_total = subtotal + tax - discount
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the raw amount in the smallest currency unit.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
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

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts an amount, returning `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Multiplies a unit price by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tabletop_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(40);
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().minor(), 120);
    /// assert!(Money::from_minor(i64::MAX).checked_mul_quantity(2).is_none());
    /// ```
    #[inline]
    pub fn checked_mul_quantity(self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Calculates tax on this amount, rounding half up to a whole unit.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP (toward +∞)                                          │
    /// │                                                                     │
    /// │  tax = floor((amount × bps + 5000) / 10000)                         │
    /// │                                                                     │
    /// │    710 × 5% = 35.5  → 36                                            │
    /// │    709 × 5% = 35.45 → 35                                            │
    /// │    700 × 5% = 35.0  → 35                                            │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// The intermediate product is computed in i128, so only a result that
    /// does not fit back into i64 yields `None`.
    ///
    /// ## Example
    /// ```rust
    /// use tabletop_core::money::Money;
    /// use tabletop_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_minor(700);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(500)).unwrap();
    /// assert_eq!(tax.minor(), 35);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Option<Money> {
        let scaled = i128::from(self.0) * i128::from(rate.bps()) + 5000;
        let tax = scaled.div_euclid(10_000);
        i64::try_from(tax).ok().map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the bare amount, e.g. `735`. Currency symbols belong to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
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

// =============================================================================
// Unit Tests
// =============================================================================
