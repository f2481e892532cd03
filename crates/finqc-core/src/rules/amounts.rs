//! Cell value sanitizing, numeric parsing and accounting-style formatting.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use super::patterns::{DASH_ONLY, NON_NUMERIC, NOTE_REFERENCE, NOTE_WORD, THOUSANDS_SEPARATOR};

/// Cell contents that mean "no value".
pub const DASH_VALUES: &[&str] = &["-", "--", "\u{2014}", "\u{2013}", "\u{2015}"];

/// Trim a cell and collapse dash placeholders to an empty string.
pub fn sanitize_value(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_dash(trimmed) {
        return String::new();
    }
    trimmed.to_string()
}

/// Sanitize an optional cell; missing cells become empty strings.
pub fn sanitize_opt(raw: Option<&str>) -> String {
    raw.map(sanitize_value).unwrap_or_default()
}

/// Whether a trimmed cell is one of the dash placeholders.
pub fn is_dash(value: &str) -> bool {
    DASH_VALUES.contains(&value)
}

/// Parse a statement amount.
///
/// Handles note references ("(Note 3) 500"), parentheses and trailing minus
/// as negative markers, and thousands separators. Anything without digits
/// left over yields `None`, never zero.
pub fn parse_numeric(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || DASH_ONLY.is_match(trimmed) {
        return None;
    }

    let without_notes = NOTE_REFERENCE.replace_all(trimmed, "");
    let mut value = NOTE_WORD.replace_all(&without_notes, "").trim().to_string();

    let mut negative = false;
    if value.len() >= 2 && value.starts_with('(') && value.ends_with(')') {
        negative = true;
        value = value[1..value.len() - 1].to_string();
    }

    if value.ends_with('-') {
        negative = true;
        value.pop();
    }

    let value = THOUSANDS_SEPARATOR.replace_all(&value, "");
    let value = NON_NUMERIC.replace_all(&value, "");

    if value.is_empty() || value == "-" || value == "--" {
        return None;
    }

    let amount = Decimal::from_str(&value).ok()?;
    Some(if negative { -amount } else { amount })
}

/// Accounting number formatter: grouped thousands, negatives in parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Fraction digits always shown.
    pub min_fraction_digits: u32,
    /// Fraction digits kept after rounding.
    pub max_fraction_digits: u32,
}

impl NumberFormat {
    /// Up to two fraction digits, trailing zeros dropped.
    pub const ACCOUNTING: NumberFormat = NumberFormat {
        min_fraction_digits: 0,
        max_fraction_digits: 2,
    };

    /// Exactly two fraction digits.
    pub const FIXED_2: NumberFormat = NumberFormat {
        min_fraction_digits: 2,
        max_fraction_digits: 2,
    };

    /// Format a decimal amount.
    pub fn format(&self, value: Decimal) -> String {
        let rounded = value
            .abs()
            .round_dp_with_strategy(self.max_fraction_digits, RoundingStrategy::MidpointAwayFromZero);

        let text = rounded.to_string();
        let (integer_part, fraction_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

        let mut fraction = fraction_part.to_string();
        let min = self.min_fraction_digits as usize;
        while fraction.len() > min && fraction.ends_with('0') {
            fraction.pop();
        }
        while fraction.len() < min {
            fraction.push('0');
        }

        let grouped = group_thousands(integer_part);
        let body = if fraction.is_empty() {
            grouped
        } else {
            format!("{}.{}", grouped, fraction)
        };

        if value.is_sign_negative() && !rounded.is_zero() {
            format!("({})", body)
        } else {
            body
        }
    }

    /// Format a float; non-finite values render as "-".
    pub fn format_f64(&self, value: f64) -> String {
        if !value.is_finite() {
            return "-".to_string();
        }
        Decimal::from_f64(value)
            .map(|d| self.format(d))
            .unwrap_or_else(|| "-".to_string())
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::ACCOUNTING
    }
}

/// Format with up to two fraction digits, accounting style.
pub fn format_number(value: Decimal) -> String {
    NumberFormat::ACCOUNTING.format(value)
}

fn group_thousands(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::with_capacity(chars.len() + chars.len() / 3);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_sanitize_value() {
        assert_eq!(sanitize_value("  1,234 "), "1,234");
        assert_eq!(sanitize_value("-"), "");
        assert_eq!(sanitize_value("--"), "");
        assert_eq!(sanitize_value(" \u{2014} "), "");
        assert_eq!(sanitize_value("\u{2013}"), "");
        assert_eq!(sanitize_opt(None), "");
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("1,234"), Some(dec("1234")));
        assert_eq!(parse_numeric("(1,234)"), Some(dec("-1234")));
        assert_eq!(parse_numeric("1234-"), Some(dec("-1234")));
        assert_eq!(parse_numeric("(Note 3) 500"), Some(dec("500")));
        assert_eq!(parse_numeric("Note 12 2,500.50"), Some(dec("2500.50")));
        assert_eq!(parse_numeric("1 234 567"), Some(dec("1234567")));
    }

    #[test]
    fn test_parse_numeric_no_value() {
        assert_eq!(parse_numeric("-"), None);
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("   "), None);
        assert_eq!(parse_numeric("\u{2014}"), None);
        assert_eq!(parse_numeric("n/a"), None);
        assert_eq!(parse_numeric("()"), None);
        assert_eq!(parse_numeric("1.2.3"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(dec("-1234")), "(1,234)");
        assert_eq!(format_number(dec("1234567.891")), "1,234,567.89");
        assert_eq!(format_number(dec("800")), "800");
        assert_eq!(format_number(dec("12.50")), "12.5");
        assert_eq!(format_number(dec("0")), "0");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(NumberFormat::FIXED_2.format(dec("1500")), "1,500.00");
        assert_eq!(NumberFormat::FIXED_2.format(dec("-0.125")), "(0.13)");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(NumberFormat::ACCOUNTING.format_f64(f64::NAN), "-");
        assert_eq!(NumberFormat::ACCOUNTING.format_f64(f64::INFINITY), "-");
        assert_eq!(NumberFormat::ACCOUNTING.format_f64(-2500.0), "(2,500)");
    }

    #[test]
    fn test_format_after_parse_is_stable() {
        let parsed = parse_numeric("(1,234)").unwrap();
        let formatted = format_number(parsed);
        assert_eq!(formatted, "(1,234)");
        assert_eq!(parse_numeric(&formatted), Some(parsed));
    }
}
