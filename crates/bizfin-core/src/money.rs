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
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing thousands of VAT amounts in f64 drifts by whole đồng.          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer đồng                                             │
//! │    VND has no minor unit in circulation, so one i64 step = 1 đồng.     │
//! │    Tax and fractional quantities are rounded ONCE, explicitly.         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bizfin_core::money::Money;
//!
//! let price = Money::from_dong(50_000);
//! let doubled = price * 2;
//! let total = price + Money::from_dong(25_000);
//!
//! assert_eq!(doubled.dong(), 100_000);
//! assert_eq!(total.dong(), 75_000);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{Quantity, TaxRate};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in đồng (the smallest VND unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: VAT payable and gross profit can go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as a plain integer** in invoice JSON
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  LineItem.unit_price × quantity ──► LineItem.line_total                 │
/// │                                           │                             │
/// │                                           ▼                             │
/// │                               Σ line totals = Invoice.amount            │
/// │                                           │                             │
/// │                      ┌────────────────────┴───────────────┐             │
/// │                      ▼                                    ▼             │
/// │            amount × VAT rate (tax)          FinancialSummary rollup     │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole đồng.
    ///
    /// ## Example
    /// ```rust
    /// use bizfin_core::money::Money;
    ///
    /// let price = Money::from_dong(15_000_000);
    /// assert_eq!(price.dong(), 15_000_000);
    /// ```
    #[inline]
    pub const fn from_dong(dong: i64) -> Self {
        Money(dong)
    }

    /// Returns the value in đồng.
    #[inline]
    pub const fn dong(&self) -> i64 {
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

    /// Returns the value, or zero when it is negative.
    ///
    /// For display only. The ledger never clamps its own figures.
    #[inline]
    pub const fn clamp_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Applies a rate (tax, CIT) and rounds half away from zero to the đồng.
    ///
    /// ## Implementation
    /// Integer math on the magnitude: `(|amount| * bps + 5000) / 10000`,
    /// then the sign is put back. Rounding is symmetric, so a refund and its
    /// original sale produce taxes that cancel exactly.
    ///
    /// ## Example
    /// ```rust
    /// use bizfin_core::money::Money;
    /// use bizfin_core::types::TaxRate;
    ///
    /// let amount = Money::from_dong(50_000_000);
    /// let vat = amount.calculate_tax(TaxRate::from_bps(1000)); // 10%
    /// assert_eq!(vat.dong(), 5_000_000);
    ///
    /// // 8% of 12,345 = 987.6 → 988
    /// let odd = Money::from_dong(12_345).calculate_tax(TaxRate::from_bps(800));
    /// assert_eq!(odd.dong(), 988);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps `amount * bps` from overflowing on large invoices
        let magnitude = (self.0.unsigned_abs() as i128 * rate.bps() as i128 + 5000) / 10000;
        let tax = if self.0 < 0 { -magnitude } else { magnitude };
        Money(tax as i64)
    }

    /// Multiplies a unit price by an exact (possibly fractional) quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bizfin_core::money::Money;
    /// use bizfin_core::types::Quantity;
    ///
    /// let unit_price = Money::from_dong(50_000);
    /// let line_total = unit_price.multiply_quantity(Quantity::from_units(20));
    /// assert_eq!(line_total.dong(), 1_000_000);
    ///
    /// let half_kg: Quantity = "0.5".parse().unwrap();
    /// assert_eq!(Money::from_dong(33_333).multiply_quantity(half_kg).dong(), 16_667);
    /// ```
    pub fn multiply_quantity(&self, qty: Quantity) -> Money {
        Money::from_decimal_rounded(Decimal::from(self.0).saturating_mul(qty.as_decimal()))
    }

    /// Rounds an exact amount half away from zero to the đồng, saturating
    /// at the i64 range.
    ///
    /// ## Example
    /// ```rust
    /// use bizfin_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_decimal_rounded(Decimal::new(19752, 1)).dong(), 1975);
    /// assert_eq!(Money::from_decimal_rounded(Decimal::new(-25, 1)).dong(), -3);
    /// ```
    pub fn from_decimal_rounded(value: Decimal) -> Money {
        let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let dong = rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        });
        Money(dong)
    }

    /// The exact decimal value of this amount.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders in the vi-VN currency format, e.g. `50.000.000 ₫`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::format_currency(*self))
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a whole quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dong() {
        let money = Money::from_dong(1_099_000);
        assert_eq!(money.dong(), 1_099_000);
        assert!(money.is_positive());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_dong(1000);
        let b = Money::from_dong(500);

        assert_eq!((a + b).dong(), 1500);
        assert_eq!((a - b).dong(), 500);
        assert_eq!((b - a).dong(), -500);
        assert_eq!((-a).dong(), -1000);
        let result: Money = a * 3;
        assert_eq!(result.dong(), 3000);
    }

    #[test]
    fn test_sum() {
        let items = [Money::from_dong(1_000_000), Money::from_dong(1_000_000)];
        let total: Money = items.iter().sum();
        assert_eq!(total.dong(), 2_000_000);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_tax_calculation_basic() {
        let amount = Money::from_dong(15_000_000);
        let tax = amount.calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.dong(), 1_500_000);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // 5% of 10 = 0.5 → 1 (half away from zero)
        assert_eq!(Money::from_dong(10).calculate_tax(TaxRate::from_bps(500)).dong(), 1);
        // 5% of 9 = 0.45 → 0
        assert_eq!(Money::from_dong(9).calculate_tax(TaxRate::from_bps(500)).dong(), 0);
    }

    #[test]
    fn test_tax_on_negative_amount_is_symmetric() {
        let rate = TaxRate::from_bps(500);
        let sale = Money::from_dong(10);
        let refund = Money::from_dong(-10);
        assert_eq!(sale.calculate_tax(rate) + refund.calculate_tax(rate), Money::zero());
    }

    #[test]
    fn test_zero_rate_yields_zero_tax() {
        let tax = Money::from_dong(120_000_000).calculate_tax(TaxRate::zero());
        assert!(tax.is_zero());
    }

    #[test]
    fn test_multiply_quantity_whole() {
        let line_total = Money::from_dong(50_000).multiply_quantity(Quantity::from_units(20));
        assert_eq!(line_total.dong(), 1_000_000);
    }

    #[test]
    fn test_multiply_quantity_fractional_rounds_half_away_from_zero() {
        let qty: Quantity = "1.5".parse().unwrap();
        assert_eq!(Money::from_dong(3).multiply_quantity(qty).dong(), 5); // 4.5 → 5
        assert_eq!(Money::from_dong(-3).multiply_quantity(qty).dong(), -5);
    }

    #[test]
    fn test_from_decimal_rounded_saturates() {
        assert_eq!(Money::from_decimal_rounded(Decimal::new(14, 1)).dong(), 1);
        assert_eq!(Money::from_decimal_rounded(Decimal::new(56, 1)).dong(), 6);
        assert_eq!(Money::from_decimal_rounded(Decimal::MAX).dong(), i64::MAX);
        assert_eq!(Money::from_decimal_rounded(Decimal::MIN).dong(), i64::MIN);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_dong(-1).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_dong(7).clamp_non_negative().dong(), 7);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_dong(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().dong(), 100);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_dong(5_000_000)).unwrap();
        assert_eq!(json, "5000000");
    }
}
