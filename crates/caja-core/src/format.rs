//! # Currency Formatting
//!
//! Display formatting for monetary values, decoupled from ledger logic.
//! The register shows USD figures in the en-US convention (`1,234.56`) and
//! bolívar figures in the es-VE convention with swapped separators
//! (`1.234,56`); both come out of the same routine with a locale tag.

use crate::money::Money;

/// Separator convention for rendered amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locale {
    /// `1,234,567.89`
    EnUs,
    /// `1.234.567,89`
    EsVe,
}

impl Locale {
    #[inline]
    fn thousands_sep(self) -> char {
        match self {
            Locale::EnUs => ',',
            Locale::EsVe => '.',
        }
    }

    #[inline]
    fn decimal_sep(self) -> char {
        match self {
            Locale::EnUs => '.',
            Locale::EsVe => ',',
        }
    }
}

/// Formats a monetary value with thousands grouping, no currency symbol.
///
/// ## Example
/// ```rust
/// use caja_core::format::{format_amount, Locale};
/// use caja_core::money::Money;
///
/// let total = Money::from_cents(123_456_789);
/// assert_eq!(format_amount(total, Locale::EnUs), "1,234,567.89");
/// assert_eq!(format_amount(total, Locale::EsVe), "1.234.567,89");
/// ```
pub fn format_amount(amount: Money, locale: Locale) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!(
        "{}{}{}{:02}",
        sign,
        group_thousands(amount.major().abs(), locale.thousands_sep()),
        locale.decimal_sep(),
        amount.minor_part()
    )
}

/// Formats an exchange rate with four decimals and thousands grouping
/// (rates are quoted to four places on the official page).
pub fn format_rate(rate: f64, locale: Locale) -> String {
    let fixed = format!("{:.4}", rate.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0000"));
    let int_value: i64 = int_part.parse().unwrap_or(0);
    let sign = if rate < 0.0 { "-" } else { "" };
    format!(
        "{}{}{}{}",
        sign,
        group_thousands(int_value, locale.thousands_sep()),
        locale.decimal_sep(),
        frac_part
    )
}

fn group_thousands(value: i64, sep: char) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(c);
    }
    grouped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn en_us_amounts() {
        assert_eq!(format_amount(Money::from_cents(0), Locale::EnUs), "0.00");
        assert_eq!(format_amount(Money::from_cents(1099), Locale::EnUs), "10.99");
        assert_eq!(
            format_amount(Money::from_cents(123_456_789), Locale::EnUs),
            "1,234,567.89"
        );
        assert_eq!(format_amount(Money::from_cents(-550), Locale::EnUs), "-5.50");
    }

    #[test]
    fn es_ve_swaps_separators() {
        assert_eq!(
            format_amount(Money::from_cents(123_456_789), Locale::EsVe),
            "1.234.567,89"
        );
        assert_eq!(format_amount(Money::from_cents(500), Locale::EsVe), "5,00");
    }

    #[test]
    fn rates_render_four_decimals() {
        assert_eq!(format_rate(36.5, Locale::EsVe), "36,5000");
        assert_eq!(format_rate(1234.56789, Locale::EsVe), "1.234,5679");
        assert_eq!(format_rate(1234.56789, Locale::EnUs), "1,234.5679");
    }

    #[test]
    fn grouping_boundaries() {
        assert_eq!(group_thousands(1, ','), "1");
        assert_eq!(group_thousands(999, ','), "999");
        assert_eq!(group_thousands(1000, ','), "1,000");
        assert_eq!(group_thousands(1_000_000, '.'), "1.000.000");
    }
}
