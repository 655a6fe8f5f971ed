pub mod balance;
pub mod voba_si;

pub use balance::extract_balance;
pub use voba_si::{scan_transactions, statement_year, ScannedTransaction};
