//! kontoauszug-ingest: statement text loading, locale value parsing and bank-specific parsers.

pub mod locale;
pub mod parsers;
pub mod pdf;
pub mod types;

pub use locale::{parse_amount, parse_date, NumberFormat};
pub use parsers::{extract_balance, scan_transactions, statement_year, ScannedTransaction};
pub use types::{StatementContext, StatementText};
