//! Balance lines, e.g.
//!
//!   ALTER KONTOSTAND VOM 31.12.2019                              EUR      1.234,56+

use kontoauszug_core::{Balance, ImportError, Meta, Result};
use regex::Regex;

use crate::locale::{parse_amount, parse_date};
use crate::types::{StatementContext, StatementText};

/// Read the balance assertion from the first line mentioning `keyword`.
pub fn extract_balance(
    text: &StatementText,
    keyword: &str,
    ctx: &StatementContext<'_>,
) -> Result<Balance> {
    let (lineno, line) = text
        .find_line(keyword)
        .ok_or_else(|| ImportError::not_found(keyword))?;

    let balance_re = Regex::new(&format!(
        r"{}.*(\d\d\.\d\d\.\d{{4}}).*{}\s*([\d.,]+)\s*([+-])",
        regex::escape(keyword),
        regex::escape(ctx.currency)
    ))?;

    let caps = balance_re.captures(line).ok_or_else(|| {
        ImportError::format(
            line,
            format!("expected '{} ... dd.mm.yyyy ... {} <amount><sign>'", keyword, ctx.currency),
        )
    })?;

    let date = parse_date(&caps[1]).map_err(|e| at_line(e, line))?;
    let sign = caps[3].chars().next().unwrap_or('+');
    let amount = parse_amount(&caps[2], sign, ctx.currency, ctx.number_format)
        .map_err(|e| at_line(e, line))?;

    log::debug!("{}: {} {} (line {})", keyword, date, amount, lineno);

    Ok(Balance {
        meta: Meta::new(ctx.filename, Some(lineno)),
        date,
        account: ctx.account.to_string(),
        amount,
    })
}

/// Point a value-level format error at the whole statement line.
pub(crate) fn at_line(err: ImportError, line: &str) -> ImportError {
    match err {
        ImportError::Format { message, .. } => ImportError::Format {
            line: line.to_string(),
            message,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::NumberFormat;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn ctx() -> StatementContext<'static> {
        StatementContext {
            filename: "statement.pdf",
            account: "Assets:Bank:Volksbank",
            currency: "EUR",
            number_format: NumberFormat::GERMAN,
        }
    }

    #[test]
    fn test_opening_and_closing_independent_of_order() {
        let text = StatementText::new(
            "  NEUER KONTOSTAND VOM 29.02.2020          EUR      50,00+\n\
             ALTER KONTOSTAND VOM 01.01.2020            EUR   1.337,42-\n",
        );

        let opening = extract_balance(&text, "ALTER KONTOSTAND", &ctx()).unwrap();
        assert_eq!(opening.date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(opening.amount.number, Decimal::from_str("-1337.42").unwrap());
        assert_eq!(opening.meta.lineno, Some(2));

        let closing = extract_balance(&text, "NEUER KONTOSTAND", &ctx()).unwrap();
        assert_eq!(closing.date, NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
        assert_eq!(closing.amount.number, Decimal::from_str("50.00").unwrap());
        assert_eq!(closing.account, "Assets:Bank:Volksbank");
    }

    #[test]
    fn test_missing_keyword_is_not_found() {
        let text = StatementText::new("KONTOAUSZUG 2020\n");
        let err = extract_balance(&text, "ALTER KONTOSTAND", &ctx()).unwrap_err();
        assert!(matches!(err, ImportError::NotFound { ref keyword } if keyword == "ALTER KONTOSTAND"));
    }

    #[test]
    fn test_malformed_line_carries_content() {
        let text = StatementText::new("ALTER KONTOSTAND siehe Anlage\n");
        match extract_balance(&text, "ALTER KONTOSTAND", &ctx()).unwrap_err() {
            ImportError::Format { line, .. } => assert_eq!(line, "ALTER KONTOSTAND siehe Anlage"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_date_reports_whole_line() {
        let line = "ALTER KONTOSTAND VOM 31.02.2020 EUR 1,00+";
        let text = StatementText::new(line);
        match extract_balance(&text, "ALTER KONTOSTAND", &ctx()).unwrap_err() {
            ImportError::Format { line: l, message } => {
                assert_eq!(l, line);
                assert!(message.contains("31.02.2020"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
