//! kontoauszug-core: ledger record types and the importer error type

pub mod error;
pub mod ledger;

pub use error::{ImportError, Result};
pub use ledger::{render_entries, Amount, Balance, Entry, Meta, Posting, Transaction};
