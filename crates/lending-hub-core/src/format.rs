//! en-US display helpers for calculator output.

use rust_decimal::RoundingStrategy;

use crate::types::{Money, Percent};

/// Whole-dollar currency: `$1,235`.
pub fn format_currency(amount: Money) -> String {
    currency(amount, 0)
}

/// Currency with cents: `$1,234.56`.
pub fn format_currency_cents(amount: Money) -> String {
    currency(amount, 2)
}

/// Percentage with three decimals: `6.500%`.
pub fn format_percent(value: Percent) -> String {
    let mut rounded = value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(3);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    format!("{rounded}%")
}

fn currency(amount: Money, dp: u32) -> String {
    let mut rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let digits = rounded.abs().to_string();
    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(whole));
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

fn group_thousands(whole: &str) -> String {
    let len = whole.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_currency_whole_dollars() {
        assert_eq!(format_currency(dec!(1234.49)), "$1,234");
        assert_eq!(format_currency(dec!(1234.5)), "$1,235");
        assert_eq!(format_currency(dec!(1916.9552)), "$1,917");
    }

    #[test]
    fn test_currency_cents() {
        assert_eq!(format_currency_cents(dec!(1234.56)), "$1,234.56");
        assert_eq!(format_currency_cents(dec!(1234.5)), "$1,234.50");
        assert_eq!(format_currency_cents(dec!(1234567.891)), "$1,234,567.89");
    }

    #[test]
    fn test_currency_small_and_zero() {
        assert_eq!(format_currency(Decimal::ZERO), "$0");
        assert_eq!(format_currency_cents(dec!(999)), "$999.00");
        assert_eq!(format_currency(dec!(-0.4)), "$0");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(dec!(-2500)), "-$2,500");
        assert_eq!(format_currency_cents(dec!(-87.5)), "-$87.50");
    }

    #[test]
    fn test_percent_three_places() {
        assert_eq!(format_percent(dec!(6.5)), "6.500%");
        assert_eq!(format_percent(dec!(7.12549)), "7.125%");
        assert_eq!(format_percent(Decimal::ZERO), "0.000%");
    }

    #[test]
    fn test_group_thousands_boundaries() {
        assert_eq!(group_thousands("100"), "100");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("100000"), "100,000");
        assert_eq!(group_thousands("1000000"), "1,000,000");
    }
}
