//! kontoauszug-finance: entry builder, narration rules and the statement importer

pub mod entry_builder;
pub mod importer;
pub mod narration_rules;

pub use entry_builder::EntryBuilder;
pub use importer::{Importer, ImporterConfig, VolksbankImporter};
pub use narration_rules::{FlagOverride, Matcher, NarrationRule, NarrationRules, Rewrite, RuleConfig};
