//! Volksbank Siegerland eG account statement (text)
//!
//! Expected extracted-text layout:
//!   KONTOAUSZUG                                        Nr. 2/2020
//!   ALTER KONTOSTAND VOM 31.01.2020                    EUR     100,00+
//!   03.02.  Lastschrift                                         50,00-
//!           EREF+4711 Stadtwerke Siegen
//!           Abschlag Februar
//!   NEUER KONTOSTAND VOM 29.02.2020                    EUR      50,00+
//!
//! A transaction starts at a `dd.mm.` header line carrying the amount and
//! continues over the indented purpose lines below it.

use chrono::NaiveDate;
use kontoauszug_core::{Amount, ImportError, Result};
use regex::Regex;

use crate::locale::{parse_amount, parse_date, NumberFormat};
use crate::parsers::balance::at_line;
use crate::types::StatementText;

pub const YEAR_KEYWORD: &str = "KONTOAUSZUG";

/// Indentation of purpose lines in the statement's fixed-width layout.
/// Deeper indented lines (balance lines, page headers) are not purpose text.
pub const CONTINUATION_INDENT: usize = 8;

/// One line item of the statement, before it becomes a ledger transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedTransaction {
    pub date: NaiveDate,
    pub amount: Amount,
    pub narration: String,
    /// 1-based line of the header
    pub lineno: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    InTransaction,
}

/// Line items without any purpose text are not booked.
fn has_narration(txn: &ScannedTransaction) -> bool {
    !txn.narration.is_empty()
}

/// Year of the statement: the last four characters of the `KONTOAUSZUG` line.
pub fn statement_year(text: &StatementText) -> Result<i32> {
    let (_, line) = text
        .find_line(YEAR_KEYWORD)
        .ok_or_else(|| ImportError::not_found(YEAR_KEYWORD))?;

    let trimmed = line.trim();
    let year = trimmed
        .char_indices()
        .rev()
        .nth(3)
        .map(|(i, _)| &trimmed[i..])
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| ImportError::format(line, "expected the statement year at the end of the line"))?;

    year.parse::<i32>()
        .map_err(|_| ImportError::format(line, format!("'{}' is not a year", year)))
}

/// Scan extracted statement text for transactions, in statement order.
pub fn scan_transactions(
    text: &StatementText,
    currency: &str,
    format: NumberFormat,
) -> Result<Vec<ScannedTransaction>> {
    let year = statement_year(text)?;

    // dd.mm.  <text> <amount><sign>
    let header_re = Regex::new(r"^(\d\d\.\d\d\.)\s\s(.*)\s([\d.,]+)([+-])\s*")?;
    let continuation_re = Regex::new(&format!(r"^\s{{{}}}(\S.*)$", CONTINUATION_INDENT))?;
    let spaces_re = Regex::new(r" {2,}")?;

    let mut state = ScanState::Idle;
    let mut pending: Option<ScannedTransaction> = None;
    let mut out = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if let Some(caps) = header_re.captures(line) {
            if let Some(done) = pending.take().filter(has_narration) {
                out.push(done);
            }

            let date = parse_date(&format!("{}{:04}", &caps[1], year)).map_err(|e| at_line(e, line))?;
            let sign = caps[4].chars().next().unwrap_or('+');
            let amount = parse_amount(&caps[3], sign, currency, format).map_err(|e| at_line(e, line))?;

            pending = Some(ScannedTransaction {
                date,
                amount,
                narration: caps[2].trim().to_string(),
                lineno: i + 1,
            });
            state = ScanState::InTransaction;
        } else if state == ScanState::InTransaction {
            match continuation_re.captures(line) {
                Some(caps) => {
                    if let Some(txn) = pending.as_mut() {
                        let joined = format!("{} {}", txn.narration, caps[1].trim());
                        txn.narration = spaces_re.replace_all(joined.trim_start(), " ").into_owned();
                    }
                }
                None => state = ScanState::Idle,
            }
        }
    }

    // The last line item has no following header to close it.
    if let Some(done) = pending.take().filter(has_narration) {
        out.push(done);
    }

    for txn in &out {
        log::debug!("line {}: {} {} {:?}", txn.lineno, txn.date, txn.amount, txn.narration);
    }

    Ok(out)
}
