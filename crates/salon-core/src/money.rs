//! # Money Module
//!
//! Provides the `Money` and `Percent` types for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In a billing pipeline that applies a membership discount, then GST,    │
//! │  then a manual adjustment, float drift compounds at every step and     │
//! │  the printed bill stops matching the audit trail.                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise + Integer Basis Points                     │
//! │    ₹10.99 = 1099 paise, 8.25% = 825 bps                                │
//! │    Every rounding step is explicit and happens exactly once             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salon_core::money::{Money, Percent};
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(109900); // ₹1099.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let discounted = price - price.percent_of(Percent::from_bps(1000)); // 10% off
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise, ₹1 = 100 paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and adjustments
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type: service
/// prices, override prices, subtotals, GST, change due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use salon_core::money::Money;
    ///
    /// let price = Money::from_paise(109900); // Represents ₹1099.00
    /// assert_eq!(price.paise(), 109900);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
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

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Clamps a negative value to zero.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// Applies a percentage to this amount, rounding half-up to whole paise.
    ///
    /// This is the single rounding boundary for percentage math. Computed
    /// amounts (GST, membership discount) are rounded exactly once, here,
    /// so drift never accumulates across line items.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount * bps + 5000) / 10000`
    /// The +5000 provides half-up rounding (5000/10000 = 0.5)
    ///
    /// ## Example
    /// ```rust
    /// use salon_core::money::{Money, Percent};
    ///
    /// let base = Money::from_paise(99000);        // ₹990.00
    /// let gst = base.percent_of(Percent::from_bps(500)); // 5%
    /// assert_eq!(gst.paise(), 4950);              // ₹49.50
    /// ```
    pub fn percent_of(&self, rate: Percent) -> Money {
        // i128 to prevent overflow on large amounts
        let amount = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(amount as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use salon_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(30000); // ₹300.00
    /// let line_total = unit_price.multiply_quantity(2);
    /// assert_eq!(line_total.paise(), 60000);     // ₹600.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5.00% (the default GST rate), 1500 bps = a 15% discount
///
/// Thresholds compared in whole basis points make boundary rules exact:
/// "15% belongs to the manager tier" never depends on float epsilon.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Percent(u32);

/// 100% expressed in basis points.
pub const FULL_PERCENT_BPS: u32 = 10000;

impl Percent {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a display percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        Percent((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the rate exceeds 100%.
    #[inline]
    pub const fn exceeds_full(&self) -> bool {
        self.0 > FULL_PERCENT_BPS
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Tax and Discount Math
// =============================================================================

/// Computes GST on a base amount, rounding half-up to whole paise.
///
/// ## Errors
/// - `InvalidInput` if `base` is negative
/// - `InvalidInput` if `rate` is above 100%
///
/// ## Example
/// ```rust
/// use salon_core::money::{compute_gst, Money, Percent};
///
/// let gst = compute_gst(Money::from_paise(99000), Percent::from_bps(500)).unwrap();
/// assert_eq!(gst.paise(), 4950); // ₹49.50 on ₹990.00 at 5%
/// ```
pub fn compute_gst(base: Money, rate: Percent) -> CoreResult<Money> {
    if base.is_negative() {
        return Err(CoreError::InvalidInput {
            field: "base_amount".to_string(),
            reason: format!("must not be negative, got {} paise", base.paise()),
        });
    }
    if rate.exceeds_full() {
        return Err(CoreError::InvalidInput {
            field: "gst_rate".to_string(),
            reason: format!("must be between 0 and 100%, got {} bps", rate.bps()),
        });
    }

    Ok(base.percent_of(rate))
}

/// Derives the discount percentage between an original and a discounted price.
///
/// ## Behavior
/// - Returns 0% when `original` is zero or negative (no division by zero)
/// - Rounds half-up to whole basis points
/// - Clamps to [0%, 100%]: a discounted price above the original (a price
///   increase, disallowed elsewhere) reads as 0%, a negative discounted
///   price reads as 100%
///
/// Pure and total: never fails.
///
/// ## Example
/// ```rust
/// use salon_core::money::{discount_percent, Money};
///
/// let pct = discount_percent(Money::from_paise(100000), Money::from_paise(85000));
/// assert_eq!(pct.bps(), 1500); // ₹1000 → ₹850 is a 15% discount
/// ```
pub fn discount_percent(original: Money, discounted: Money) -> Percent {
    if original.paise() <= 0 {
        return Percent::zero();
    }

    let reduction = original.paise() as i128 - discounted.paise() as i128;
    if reduction <= 0 {
        return Percent::zero();
    }

    // Half-up to whole basis points
    let bps = (reduction * FULL_PERCENT_BPS as i128 + original.paise() as i128 / 2)
        / original.paise() as i128;

    if bps >= FULL_PERCENT_BPS as i128 {
        Percent::from_bps(FULL_PERCENT_BPS)
    } else {
        Percent::from_bps(bps as u32)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(109900);
        assert_eq!(money.paise(), 109900);
        assert_eq!(money.rupees(), 1099);
        assert_eq!(money.paise_part(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(109950)), "₹1099.50");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        let result: Money = a * 3;
        assert_eq!(result.paise(), 3000);
    }

    #[test]
    fn test_percent_of_basic() {
        // ₹990.00 at 5% = ₹49.50
        let base = Money::from_paise(99000);
        let rate = Percent::from_bps(500);
        assert_eq!(base.percent_of(rate).paise(), 4950);
    }

    #[test]
    fn test_percent_of_rounds_half_up() {
        // ₹10.00 at 8.25% = 82.5 paise → 83 paise
        let base = Money::from_paise(1000);
        let rate = Percent::from_bps(825);
        assert_eq!(base.percent_of(rate).paise(), 83);
    }

    #[test]
    fn test_compute_gst() {
        let gst = compute_gst(Money::from_paise(99000), Percent::from_bps(500)).unwrap();
        assert_eq!(gst.paise(), 4950);

        // Zero rate, zero base are both fine
        assert_eq!(
            compute_gst(Money::zero(), Percent::from_bps(500))
                .unwrap()
                .paise(),
            0
        );
        assert_eq!(
            compute_gst(Money::from_paise(1000), Percent::zero())
                .unwrap()
                .paise(),
            0
        );
    }

    #[test]
    fn test_compute_gst_rejects_bad_input() {
        assert!(compute_gst(Money::from_paise(-1), Percent::from_bps(500)).is_err());
        assert!(compute_gst(Money::from_paise(1000), Percent::from_bps(10001)).is_err());
        // 100% exactly is allowed
        assert!(compute_gst(Money::from_paise(1000), Percent::from_bps(10000)).is_ok());
    }

    #[test]
    fn test_discount_percent() {
        // ₹1000 → ₹850 is 15%
        let pct = discount_percent(Money::from_paise(100000), Money::from_paise(85000));
        assert_eq!(pct.bps(), 1500);

        // ₹1000 → ₹400 is 60%
        let pct = discount_percent(Money::from_paise(100000), Money::from_paise(40000));
        assert_eq!(pct.bps(), 6000);
    }

    #[test]
    fn test_discount_percent_zero_original() {
        // Guard against division by zero: zero or negative original reads as 0%
        assert!(discount_percent(Money::zero(), Money::zero()).is_zero());
        assert!(discount_percent(Money::from_paise(-100), Money::zero()).is_zero());
    }

    #[test]
    fn test_discount_percent_clamps() {
        // Discounted above original (price increase) clamps to 0%
        let pct = discount_percent(Money::from_paise(1000), Money::from_paise(2000));
        assert!(pct.is_zero());

        // Negative discounted price clamps to 100%
        let pct = discount_percent(Money::from_paise(1000), Money::from_paise(-500));
        assert_eq!(pct.bps(), FULL_PERCENT_BPS);
    }

    #[test]
    fn test_discount_percent_rounds_half_up() {
        // ₹3.00 → ₹2.00: 33.333...% → 3333 bps
        let pct = discount_percent(Money::from_paise(300), Money::from_paise(200));
        assert_eq!(pct.bps(), 3333);

        // ₹2.00 → ₹1.00 - 1 paise: 50.5% → 5050 bps
        let pct = discount_percent(Money::from_paise(200), Money::from_paise(99));
        assert_eq!(pct.bps(), 5050);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_paise(-50).clamp_non_negative().paise(), 0);
        assert_eq!(Money::from_paise(50).clamp_non_negative().paise(), 50);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(format!("{}", Percent::from_bps(500)), "5.00%");
        assert_eq!(format!("{}", Percent::from_bps(825)), "8.25%");
    }
}
