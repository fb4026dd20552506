//! vi-VN currency rendering.
//!
//! `50000000` → `50.000.000 ₫`: dots between thousands, no fractional
//! digits, a non-breaking space before the đồng sign.

use rust_decimal::Decimal;

use crate::money::Money;

/// Currency sign appended to every amount.
pub const CURRENCY_SYMBOL: &str = "₫";

/// Formats an amount the way the vi-VN locale renders VND.
///
/// ```rust
/// use bizfin_core::format::format_currency;
/// use bizfin_core::money::Money;
///
/// assert_eq!(format_currency(Money::from_dong(3_500_000)), "3.500.000\u{a0}₫");
/// assert_eq!(format_currency(Money::from_dong(-1_500)), "-1.500\u{a0}₫");
/// ```
pub fn format_currency(amount: Money) -> String {
    let digits = amount.dong().unsigned_abs().to_string();
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{sign}{}\u{a0}{CURRENCY_SYMBOL}", group_thousands(&digits))
}

/// Formats an exact amount, rounded half away from zero to the đồng.
///
/// ```rust
/// use bizfin_core::format::format_decimal_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_decimal_currency(Decimal::new(19752, 1)), "1.975\u{a0}₫");
/// ```
pub fn format_decimal_currency(amount: Decimal) -> String {
    format_currency(Money::from_decimal_rounded(amount))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}
