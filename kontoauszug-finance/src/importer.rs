//! Importer for PDF account statements of Volksbank Siegerland eG.

use std::path::{Path, PathBuf};

use kontoauszug_core::{Entry, ImportError, Result};
use kontoauszug_ingest::{
    extract_balance, scan_transactions, NumberFormat, StatementContext, StatementText,
};
use serde::{Deserialize, Serialize};

use crate::entry_builder::EntryBuilder;
use crate::narration_rules::NarrationRules;

pub const ISSUER_MARKER: &str = "Volksbank Siegerland eG";
pub const OPENING_BALANCE_KEYWORD: &str = "ALTER KONTOSTAND";
pub const CLOSING_BALANCE_KEYWORD: &str = "NEUER KONTOSTAND";

/// A statement importer: recognises its documents and turns them into entries.
pub trait Importer {
    fn name(&self) -> &'static str;

    fn identify(&self, path: &Path) -> Result<bool>;

    fn extract(&self, path: &Path) -> Result<Vec<Entry>>;

    fn file_account(&self, path: &Path) -> &str;

    /// `extract`, refusing files `identify` does not accept.
    fn extract_checked(&self, path: &Path) -> Result<Vec<Entry>> {
        if !self.identify(path)? {
            return Err(ImportError::UnsupportedDocument {
                path: path.to_path_buf(),
            });
        }
        self.extract(path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Account the statement belongs to (first leg of every transaction)
    pub importing_account: String,
    /// Counter account for transactions no rule matches
    pub default_adjacent_account: String,
    pub currency: String,
    pub flag: char,
    /// Journal the entries are meant for; not read by the importer itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_journal: Option<PathBuf>,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            importing_account: "Assets:Bank:Volksbank".to_string(),
            default_adjacent_account: "Unknown".to_string(),
            currency: "EUR".to_string(),
            flag: '*',
            target_journal: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VolksbankImporter {
    config: ImporterConfig,
    builder: EntryBuilder,
    number_format: NumberFormat,
}

impl VolksbankImporter {
    pub fn new(config: ImporterConfig) -> Self {
        let builder = EntryBuilder::new(&config.importing_account, &config.default_adjacent_account)
            .with_flag(config.flag);
        Self {
            config,
            builder,
            number_format: NumberFormat::GERMAN,
        }
    }

    pub fn with_rules(mut self, rules: NarrationRules) -> Self {
        self.builder = self.builder.with_rules(rules);
        self
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    pub fn identify_text(&self, text: &StatementText) -> bool {
        text.contains(ISSUER_MARKER)
    }

    /// Balances and transactions of one statement, sorted by date.
    /// Entries on the same date keep their emission order.
    pub fn extract_text(&self, text: &StatementText, filename: &str) -> Result<Vec<Entry>> {
        let ctx = StatementContext {
            filename,
            account: &self.config.importing_account,
            currency: &self.config.currency,
            number_format: self.number_format,
        };

        let opening = extract_balance(text, OPENING_BALANCE_KEYWORD, &ctx)?;
        let closing = extract_balance(text, CLOSING_BALANCE_KEYWORD, &ctx)?;
        let scanned = scan_transactions(text, &self.config.currency, self.number_format)?;

        if scanned.is_empty() {
            log::warn!("{}: no transactions found", filename);
        }
        log::info!(
            "{}: {} transactions, balance {} -> {}",
            filename,
            scanned.len(),
            opening.amount,
            closing.amount
        );

        let mut entries: Vec<Entry> = vec![opening.into(), closing.into()];
        entries.extend(
            scanned
                .iter()
                .map(|txn| Entry::from(self.builder.build(txn, filename))),
        );
        entries.sort_by_key(Entry::date);

        Ok(entries)
    }
}

impl Default for VolksbankImporter {
    fn default() -> Self {
        Self::new(ImporterConfig::default())
    }
}

impl Importer for VolksbankImporter {
    fn name(&self) -> &'static str {
        "de.voba-si"
    }

    fn identify(&self, path: &Path) -> Result<bool> {
        let text = StatementText::read(path)?;
        Ok(self.identify_text(&text))
    }

    fn extract(&self, path: &Path) -> Result<Vec<Entry>> {
        let text = StatementText::read(path)?;
        if let Some(journal) = &self.config.target_journal {
            log::debug!("target journal: {}", journal.display());
        }
        self.extract_text(&text, &path.display().to_string())
    }

    fn file_account(&self, _path: &Path) -> &str {
        &self.config.importing_account
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ImporterConfig::default();
        assert_eq!(cfg.importing_account, "Assets:Bank:Volksbank");
        assert_eq!(cfg.default_adjacent_account, "Unknown");
        assert_eq!(cfg.currency, "EUR");
        assert_eq!(cfg.flag, '*');
        assert!(cfg.target_journal.is_none());
    }

    #[test]
    fn test_identify_text() {
        let importer = VolksbankImporter::default();
        assert!(importer.identify_text(&StatementText::new("... Volksbank Siegerland eG ...")));
        assert!(!importer.identify_text(&StatementText::new("Sparkasse Siegen")));
    }

    #[test]
    fn test_file_account_and_name() {
        let importer = VolksbankImporter::new(ImporterConfig {
            importing_account: "Assets:DE:VobaSi:Giro".to_string(),
            ..Default::default()
        });
        assert_eq!(importer.file_account(Path::new("x.pdf")), "Assets:DE:VobaSi:Giro");
        assert_eq!(importer.name(), "de.voba-si");
    }

    #[test]
    fn test_missing_balance_fails_whole_import() {
        let text = StatementText::new(
            "KONTOAUSZUG 2020\n\
             ALTER KONTOSTAND VOM 01.01.2020 EUR 100,00+\n\
             01.02.  Some Text          50,00-\n",
        );
        let err = VolksbankImporter::default().extract_text(&text, "s.txt").unwrap_err();
        assert!(matches!(err, ImportError::NotFound { ref keyword } if keyword == CLOSING_BALANCE_KEYWORD));
    }
}
