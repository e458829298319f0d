//! # Money Module
//!
//! Monetary values as integer minor units (cents), and the tax-inclusive
//! decomposition used on every receipt.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  In floating point:  0.1 + 0.2 = 0.30000000000000004                    │
//! │                                                                         │
//! │  OUR SOLUTION: integer cents. €2.50 is 250. Line totals, report sums   │
//! │  and counter arithmetic are exact; rounding happens in exactly one      │
//! │  place (the inclusive tax split) and is applied once per figure.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tax decomposition
//! Prices are gross (tax-inclusive). For a gross amount and rate `r`:
//! `tax = round(gross * r / (1 + r))`, rounded half away from zero, and
//! `net = gross - tax` as the residual. Net is never rounded independently,
//! which makes `gross == tax + net` hold for every input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Example
/// ```rust
/// use kassa_core::money::Money;
///
/// let price = Money::from_cents(250); // €2.50
/// let line = price.multiply_quantity(2);
/// assert_eq!(line.cents(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (euros) portion.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
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

    /// Multiplies by a quantity (line total = unit price × qty).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Decomposes this tax-inclusive gross amount into tax and net parts.
    ///
    /// The tax share is `gross * rate / (1 + rate)` rounded half away from
    /// zero; the net share is the residual `gross - tax`. The residual form
    /// is load-bearing: rounding tax and net independently can miss
    /// `gross == tax + net` by one cent.
    ///
    /// ## Example
    /// ```rust
    /// use kassa_core::money::{Money, TaxRate};
    ///
    /// let parts = Money::from_cents(800).split_inclusive(TaxRate::from_bps(2000));
    /// assert_eq!(parts.tax.cents(), 133); // 8.00 * 20/120 = 1.3333 → 1.33
    /// assert_eq!(parts.net.cents(), 667);
    /// ```
    pub fn split_inclusive(&self, rate: TaxRate) -> TaxBreakdown {
        // i128 intermediates: gross_cents * bps cannot overflow
        let tax = div_round_half_away(
            self.0 as i128 * rate.bps() as i128,
            10_000 + rate.bps() as i128,
        );
        let tax = Money::from_cents(tax as i64);
        TaxBreakdown {
            gross: *self,
            tax,
            net: *self - tax,
        }
    }
}

/// Integer division rounding half away from zero.
///
/// Matches the figure a human reads off the register: 0.5 cents round up
/// (for positive amounts), never to the nearest even digit. Idempotent on
/// already-whole values by construction.
fn div_round_half_away(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    let quot = num / den;
    let rem = num % den;
    if 2 * rem.abs() >= den {
        if num < 0 {
            quot - 1
        } else {
            quot + 1
        }
    } else {
        quot
    }
}

/// Result of an inclusive tax split. Invariant: `gross == tax + net`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub gross: Money,
    pub tax: Money,
    pub net: Money,
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (2000 bps = 20.00%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Fixed-format percentage label, e.g. `20.00%`. Used on receipts, so
    /// the formatting must stay deterministic and locale-free.
    pub fn percent_label(&self) -> String {
        format!("{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Fixed `€8.00` formatting. Shared by receipts and logs; must never
/// become locale-dependent.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}€{}.{:02}", sign, self.euros().abs(), self.cents_part())
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
