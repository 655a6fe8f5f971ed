//! Parsing of locale-formatted dates and amounts as printed on statements.

use std::str::FromStr;

use chrono::NaiveDate;
use kontoauszug_core::{Amount, ImportError, Result};
use rust_decimal::Decimal;

/// Digit grouping and decimal separator of printed amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub thousands: char,
    pub decimal: char,
}

impl NumberFormat {
    /// `1.337,42`
    pub const GERMAN: NumberFormat = NumberFormat {
        thousands: '.',
        decimal: ',',
    };

    /// Rewrite a printed number into `1337.42` form.
    pub fn normalize(&self, raw: &str) -> String {
        raw.trim()
            .chars()
            .filter(|c| *c != self.thousands)
            .map(|c| if c == self.decimal { '.' } else { c })
            .collect()
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::GERMAN
    }
}

fn numeric_component(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

/// Parse a `dd.mm.yyyy` date. Quote characters around the value are ignored.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let cleaned = s.replace('"', "");
    let parts: Vec<&str> = cleaned.trim().split('.').collect();
    if parts.len() != 3 || !parts.iter().all(|p| numeric_component(p)) {
        return Err(ImportError::format(s, format!("'{}' is not a dd.mm.yyyy date", s)));
    }

    let out_of_range = |_| ImportError::format(s, format!("'{}' is out of range", s));
    let day: u32 = parts[0].parse().map_err(out_of_range)?;
    let month: u32 = parts[1].parse().map_err(out_of_range)?;
    let year: i32 = parts[2].parse().map_err(out_of_range)?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ImportError::format(s, format!("'{}' is not a calendar date", s)))
}

/// Parse a printed amount with its trailing sign character (`+` or `-`).
///
/// The magnitude is parsed as an exact decimal; `"1.337,42"` with sign `-`
/// becomes exactly `-1337.42`.
pub fn parse_amount(raw: &str, sign: char, currency: &str, format: NumberFormat) -> Result<Amount> {
    let mut number = format.normalize(raw);
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(ImportError::format(raw, format!("'{}' is not an amount", raw)));
    }

    match sign {
        '+' => {}
        '-' => number.insert(0, '-'),
        other => {
            return Err(ImportError::format(
                raw,
                format!("unexpected sign '{}' after amount", other),
            ));
        }
    }

    let number = Decimal::from_str(&number)
        .map_err(|e| ImportError::format(raw, format!("'{}' is not an amount: {}", raw, e)))?;
    Ok(Amount::new(number, currency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[rstest]
    #[case("01.03.2020", 2020, 3, 1)]
    #[case("\"29.02.2020\"", 2020, 2, 29)]
    #[case("31.12.1999", 1999, 12, 31)]
    #[case(" 1.2.2021 ", 2021, 2, 1)]
    fn test_parse_date(#[case] input: &str, #[case] y: i32, #[case] m: u32, #[case] d: u32) {
        assert_eq!(parse_date(input).unwrap(), NaiveDate::from_ymd_opt(y, m, d).unwrap());
    }

    #[rstest]
    #[case::two_parts("1.2")]
    #[case::letters("aa.bb.cccc")]
    #[case::not_a_day("31.02.2020")]
    #[case::four_parts("01.02.2020.1")]
    #[case::empty_part("01..2020")]
    #[case::signed("-1.02.2020")]
    fn test_parse_date_rejects(#[case] input: &str) {
        let err = parse_date(input).unwrap_err();
        assert!(matches!(err, ImportError::Format { .. }), "{input}: {err}");
    }

    #[rstest]
    #[case("1.337,42", '-', "-1337.42")]
    #[case("1.337,42", '+', "1337.42")]
    #[case("100,00", '+', "100.00")]
    #[case("0,01", '-', "-0.01")]
    #[case("1.000.000,00", '+', "1000000.00")]
    fn test_parse_amount_german(#[case] raw: &str, #[case] sign: char, #[case] expected: &str) {
        let amount = parse_amount(raw, sign, "EUR", NumberFormat::GERMAN).unwrap();
        assert_eq!(amount.number, dec(expected));
        assert_eq!(amount.currency, "EUR");
    }

    #[test]
    fn test_parse_amount_keeps_scale() {
        let amount = parse_amount("50,00", '-', "EUR", NumberFormat::GERMAN).unwrap();
        assert_eq!(amount.to_string(), "-50.00 EUR");
    }

    #[test]
    fn test_parse_amount_custom_separators() {
        let format = NumberFormat {
            thousands: ',',
            decimal: '.',
        };
        let amount = parse_amount("1,337.42", '-', "USD", format).unwrap();
        assert_eq!(amount.number, dec("-1337.42"));
    }

    #[rstest]
    #[case::empty("", '+')]
    #[case::letters("12a,00", '+')]
    #[case::bad_sign("12,00", '*')]
    #[case::inner_sign("1-2,00", '+')]
    fn test_parse_amount_rejects(#[case] raw: &str, #[case] sign: char) {
        let err = parse_amount(raw, sign, "EUR", NumberFormat::GERMAN).unwrap_err();
        assert!(matches!(err, ImportError::Format { .. }));
    }
}
