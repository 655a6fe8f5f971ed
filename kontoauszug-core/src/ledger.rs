//! Ledger record types produced by statement importers.
//!
//! The records mirror beancount directives closely enough that `Display`
//! renders them as valid ledger text.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Neg;

/// A decimal number with its currency code (e.g. `-50.00 EUR`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub number: Decimal,
    pub currency: String,
}

impl Amount {
    pub fn new(number: Decimal, currency: impl Into<String>) -> Self {
        Self {
            number,
            currency: currency.into(),
        }
    }
}

impl Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount {
            number: -self.number,
            currency: self.currency.clone(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.currency)
    }
}

/// Where an entry came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub filename: String,
    /// 1-based line in the extracted statement text
    pub lineno: Option<usize>,
}

impl Meta {
    pub fn new(filename: impl Into<String>, lineno: Option<usize>) -> Self {
        Self {
            filename: filename.into(),
            lineno,
        }
    }
}

/// Balance assertion: `account` holds exactly `amount` at the start of `date`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub meta: Meta,
    pub date: NaiveDate,
    pub account: String,
    pub amount: Amount,
}

/// One leg of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub account: String,
    pub units: Amount,
    /// Per-posting flag, e.g. `!` to mark a leg that still needs review
    pub flag: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub meta: Meta,
    pub date: NaiveDate,
    pub flag: char,
    pub payee: Option<String>,
    pub narration: String,
    pub postings: Vec<Posting>,
}

impl Transaction {
    /// Returns true if the postings sum to zero in every currency.
    pub fn is_balanced(&self) -> bool {
        let mut sums: Vec<(&str, Decimal)> = Vec::new();
        for p in &self.postings {
            match sums.iter_mut().find(|(c, _)| *c == p.units.currency) {
                Some((_, sum)) => *sum += p.units.number,
                None => sums.push((p.units.currency.as_str(), p.units.number)),
            }
        }
        sums.iter().all(|(_, sum)| sum.is_zero())
    }
}

/// Anything an importer emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    Balance(Balance),
    Transaction(Transaction),
}

impl Entry {
    pub fn date(&self) -> NaiveDate {
        match self {
            Entry::Balance(b) => b.date,
            Entry::Transaction(t) => t.date,
        }
    }

    pub fn as_balance(&self) -> Option<&Balance> {
        match self {
            Entry::Balance(b) => Some(b),
            Entry::Transaction(_) => None,
        }
    }

    pub fn as_transaction(&self) -> Option<&Transaction> {
        match self {
            Entry::Transaction(t) => Some(t),
            Entry::Balance(_) => None,
        }
    }
}

impl From<Balance> for Entry {
    fn from(b: Balance) -> Self {
        Entry::Balance(b)
    }
}

impl From<Transaction> for Entry {
    fn from(t: Transaction) -> Self {
        Entry::Transaction(t)
    }
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} balance {}  {}", self.date, self.account, self.amount)
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.flag {
            Some(flag) => write!(f, "{} {}  {}", flag, self.account, self.units),
            None => write!(f, "{}  {}", self.account, self.units),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.flag)?;
        if let Some(payee) = &self.payee {
            write!(f, " {}", quoted(payee))?;
        }
        write!(f, " {}", quoted(&self.narration))?;
        for p in &self.postings {
            write!(f, "\n  {}", p)?;
        }
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Balance(b) => fmt::Display::fmt(b, f),
            Entry::Transaction(t) => fmt::Display::fmt(t, f),
        }
    }
}

/// Render entries as a beancount fragment, one blank line between directives.
pub fn render_entries(entries: &[Entry]) -> String {
    let mut out = String::new();
    for (i, e) in entries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&e.to_string());
        out.push('\n');
    }
    out
}
