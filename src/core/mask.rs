//! Display masks for numeric inputs and dates.
//!
//! Masks only change how a number is typed and shown. The stored value stays a plain
//! number: `$1,234.56` is stored as `1234.56`, `TRA-000042` as `42`.

/// Format used by the date picker for input and display (`m/d/Y`).
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Most decimal places a mask renders; larger settings are clamped.
pub const MAX_DECIMAL_PLACES: u32 = 18;

/// Money-style input mask.
///
/// Typed digits fill from the right: with two decimal places, typing `123456` shows
/// `$1,234.56`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoneyMask {
    /// Text shown before the number
    pub prefix: String,
    /// Separator between groups of three whole digits
    pub thousands_separator: Option<char>,
    /// Digits after the decimal point, at most [`MAX_DECIMAL_PLACES`]
    pub decimal_places: u32,
    /// Whether a leading `-` is accepted
    pub signed: bool,
}

impl MoneyMask {
    /// `$` prefix, comma thousands, two decimals, non-negative.
    #[must_use]
    pub fn currency() -> Self {
        Self {
            prefix: "$".to_string(),
            thousands_separator: Some(','),
            decimal_places: 2,
            signed: false,
        }
    }

    /// `TRA-0000` prefix, no separator, whole numbers, non-negative.
    #[must_use]
    pub fn transaction_number() -> Self {
        Self {
            prefix: "TRA-0000".to_string(),
            thousands_separator: None,
            decimal_places: 0,
            signed: false,
        }
    }

    fn decimals(&self) -> usize {
        self.decimal_places.min(MAX_DECIMAL_PLACES) as usize
    }

    /// Sign and significant digits of typed input, `None` when there are no digits.
    fn typed_digits(&self, raw: &str) -> Option<(bool, String)> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return None;
        }
        let significant = digits.trim_start_matches('0').to_string();
        let negative =
            self.signed && !significant.is_empty() && raw.trim_start().starts_with('-');
        Some((negative, significant))
    }

    /// Splits significant digits into whole and fraction parts, the last `decimals`
    /// digits being the fraction.
    fn split_digits(&self, digits: &str) -> (String, String) {
        let decimals = self.decimals();
        let padded = format!("{digits:0>width$}", width = decimals + 1);
        let (whole, fraction) = padded.split_at(padded.len() - decimals);
        (whole.to_string(), fraction.to_string())
    }

    fn render(&self, negative: bool, whole: &str, fraction: &str) -> String {
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&self.prefix);
        match self.thousands_separator {
            Some(separator) => out.push_str(&group_thousands(whole, separator)),
            None => out.push_str(whole),
        }
        if !fraction.is_empty() {
            out.push('.');
            out.push_str(fraction);
        }
        out
    }

    /// Masks raw typed input. Non-digits are dropped; empty input stays empty.
    #[must_use]
    pub fn apply(&self, raw: &str) -> String {
        self.typed_digits(raw)
            .map(|(negative, digits)| {
                let (whole, fraction) = self.split_digits(&digits);
                self.render(negative, &whole, &fraction)
            })
            .unwrap_or_default()
    }

    /// Numeric value of raw typed input.
    #[must_use]
    pub fn value_of(&self, raw: &str) -> Option<f64> {
        let (negative, digits) = self.typed_digits(raw)?;
        let (whole, fraction) = self.split_digits(&digits);
        let number = if fraction.is_empty() {
            whole
        } else {
            format!("{whole}.{fraction}")
        };
        let value: f64 = number.parse().ok()?;
        Some(if negative { -value } else { value })
    }

    /// Shows a stored value through the mask, rounded to its decimal places.
    ///
    /// Non-finite values show as an empty string.
    #[must_use]
    pub fn format_value(&self, value: f64) -> String {
        if !value.is_finite() {
            return String::new();
        }
        let rounded = format!("{:.*}", self.decimals(), value.abs());
        let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
        let is_zero = rounded.chars().all(|c| c == '0' || c == '.');
        self.render(value < 0.0 && !is_zero, whole, fraction)
    }

    /// Reads a masked display string back into its value.
    ///
    /// Returns `None` for text that is not a number, and for negative numbers when
    /// the mask is unsigned.
    #[must_use]
    pub fn unmask(&self, display: &str) -> Option<f64> {
        let trimmed = display.trim();
        let (negative, rest) = trimmed
            .strip_prefix('-')
            .map_or((false, trimmed), |rest| (true, rest));
        if negative && !self.signed {
            return None;
        }
        let rest = rest.strip_prefix(self.prefix.as_str()).unwrap_or(rest);
        let number: String = rest
            .chars()
            .filter(|&c| Some(c) != self.thousands_separator)
            .collect();
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return None;
        }
        let value: f64 = number.parse().ok()?;
        Some(if negative { -value } else { value })
    }
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(separator);
        }
        out.push(digit);
    }
    out
}

/// Symbol shown for a currency code; unknown codes are shown as `CODE `.
#[must_use]
pub fn currency_symbol(currency: &str) -> String {
    match currency.to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        other => format!("{other} "),
    }
}

/// Formats an amount for a money column, e.g. `format_money(-12.5, "USD", 2)` →
/// `-$12.50`.
#[must_use]
pub fn format_money(amount: f64, currency: &str, decimal_places: u32) -> String {
    MoneyMask {
        prefix: currency_symbol(currency),
        thousands_separator: Some(','),
        decimal_places,
        signed: true,
    }
    .format_value(amount)
}

/// Parses a date typed in the picker format.
#[must_use]
pub fn parse_date(input: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

/// Formats a date in the picker format.
#[must_use]
pub fn format_date(date: chrono::NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_currency_mask_fills_from_the_right() {
        let mask = MoneyMask::currency();
        assert_eq!(mask.apply("123456"), "$1,234.56");
        assert_eq!(mask.value_of("123456"), Some(1234.56));
        assert_eq!(mask.apply("5"), "$0.05");
        assert_eq!(mask.apply("100000000"), "$1,000,000.00");
        assert_eq!(mask.apply(""), "");
        assert_eq!(mask.apply("abc"), "");
    }

    #[test]
    fn test_currency_mask_ignores_sign_when_unsigned() {
        let mask = MoneyMask::currency();
        assert_eq!(mask.apply("-2500"), "$25.00");
        assert_eq!(mask.unmask("-$25.00"), None);
    }

    #[test]
    fn test_signed_mask_keeps_sign() {
        let mask = MoneyMask {
            signed: true,
            ..MoneyMask::currency()
        };
        assert_eq!(mask.apply("-2500"), "-$25.00");
        assert_eq!(mask.value_of("-2500"), Some(-25.0));
        assert_eq!(mask.unmask("-$25.00"), Some(-25.0));
    }

    #[test]
    fn test_transaction_number_mask() {
        let mask = MoneyMask::transaction_number();
        assert_eq!(mask.apply("42"), "TRA-000042");
        assert_eq!(mask.apply("1234567"), "TRA-00001234567");
        assert_eq!(mask.value_of("42"), Some(42.0));
        assert_eq!(mask.format_value(42.0), "TRA-000042");
        assert_eq!(mask.unmask("TRA-000042"), Some(42.0));
    }

    #[test]
    fn test_format_and_unmask_stored_values() {
        let mask = MoneyMask::currency();
        assert_eq!(mask.format_value(1234.5), "$1,234.50");
        assert_eq!(mask.format_value(0.0), "$0.00");
        assert_eq!(mask.format_value(999.999), "$1,000.00");
        assert_eq!(mask.unmask("$1,234.56"), Some(1234.56));
        assert_eq!(mask.unmask("1234.56"), Some(1234.56));
        assert_eq!(mask.unmask("$12x"), None);
        assert_eq!(mask.unmask(""), None);
    }

    #[test]
    fn test_format_money_columns() {
        assert_eq!(format_money(1234.56, "USD", 2), "$1,234.56");
        assert_eq!(format_money(-12.5, "usd", 2), "-$12.50");
        assert_eq!(format_money(10.0, "EUR", 2), "€10.00");
        assert_eq!(format_money(3.0, "CHF", 0), "CHF 3");
    }

    #[test]
    fn test_long_input_keeps_every_digit() {
        let mask = MoneyMask::currency();
        assert_eq!(
            mask.apply("12345678901234567890"),
            "$123,456,789,012,345,678.90"
        );
        assert_eq!(
            mask.value_of("12345678901234567890"),
            Some(123_456_789_012_345_678.90)
        );
        assert_eq!(mask.apply("000"), "$0.00");
        assert_eq!(mask.apply("007"), "$0.07");
    }

    #[test]
    fn test_large_stored_values_are_not_truncated() {
        let mask = MoneyMask::currency();
        assert_eq!(mask.format_value(1e20), "$100,000,000,000,000,000,000.00");
        assert!(mask.format_value(1e30).starts_with("$1,000,000,000,000,000,0"));
        assert_eq!(mask.format_value(f64::NAN), "");
        assert_eq!(mask.format_value(-0.001), "$0.00");
    }

    #[test]
    fn test_decimal_places_are_clamped() {
        let many = format_money(1.0, "USD", 19);
        assert_eq!(many, format!("$1.{}", "0".repeat(18)));
        assert_eq!(format_money(1.5, "USD", u32::MAX), many.replacen("1.0", "1.5", 1));

        let mask = MoneyMask {
            decimal_places: 40,
            ..MoneyMask::currency()
        };
        assert_eq!(mask.apply("1"), format!("$0.{}1", "0".repeat(17)));
    }

    #[test]
    fn test_date_round_trip_in_picker_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(date), "03/07/2024");
        assert_eq!(parse_date("03/07/2024"), Some(date));
        assert_eq!(parse_date("2024-03-07"), None);
    }
}
