//! Entry builder: turns scanned statement line items into balanced
//! two-posting ledger transactions.

use kontoauszug_core::{Meta, Posting, Transaction};
use kontoauszug_ingest::ScannedTransaction;

use crate::narration_rules::NarrationRules;

/// Flag on the counter posting until a rule says otherwise; marks the leg
/// for review in the ledger.
pub const DEFAULT_COUNTER_FLAG: char = '!';

#[derive(Debug, Clone)]
pub struct EntryBuilder {
    pub importing_account: String,
    pub default_adjacent_account: String,
    pub flag: char,
    pub counter_flag: Option<char>,
    pub rules: NarrationRules,
}

impl EntryBuilder {
    pub fn new(importing_account: impl Into<String>, default_adjacent_account: impl Into<String>) -> Self {
        Self {
            importing_account: importing_account.into(),
            default_adjacent_account: default_adjacent_account.into(),
            flag: '*',
            counter_flag: Some(DEFAULT_COUNTER_FLAG),
            rules: NarrationRules::default(),
        }
    }

    pub fn with_flag(mut self, flag: char) -> Self {
        self.flag = flag;
        self
    }

    pub fn with_rules(mut self, rules: NarrationRules) -> Self {
        self.rules = rules;
        self
    }

    /// First posting: importing account, statement amount.
    /// Second posting: counter account, exact negation.
    pub fn build(&self, txn: &ScannedTransaction, filename: &str) -> Transaction {
        let mut narration = txn.narration.clone();
        let mut counter_account = self.default_adjacent_account.clone();
        let mut counter_flag = self.counter_flag;

        if let Some(rule) = self.rules.first_match(&txn.narration) {
            log::debug!("rule '{}' applies to line {}", rule.name, txn.lineno);
            if let Some(n) = &rule.rewrite.narration {
                narration = n.clone();
            }
            if let Some(a) = &rule.rewrite.account {
                counter_account = a.clone();
            }
            counter_flag = rule.rewrite.flag.apply(counter_flag);
        }

        Transaction {
            meta: Meta::new(filename, Some(txn.lineno)),
            date: txn.date,
            flag: self.flag,
            payee: None,
            narration,
            postings: vec![
                Posting {
                    account: self.importing_account.clone(),
                    units: txn.amount.clone(),
                    flag: None,
                },
                Posting {
                    account: counter_account,
                    units: -&txn.amount,
                    flag: counter_flag,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narration_rules::{FlagOverride, NarrationRule, Rewrite};
    use chrono::NaiveDate;
    use kontoauszug_core::Amount;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn scanned(narration: &str, amount: &str) -> ScannedTransaction {
        ScannedTransaction {
            date: NaiveDate::from_ymd_opt(2020, 2, 1).unwrap(),
            amount: Amount::new(Decimal::from_str(amount).unwrap(), "EUR"),
            narration: narration.to_string(),
            lineno: 7,
        }
    }

    fn builder() -> EntryBuilder {
        EntryBuilder::new("Assets:Bank:Volksbank", "Expenses:Unklar")
    }

    #[test]
    fn test_default_legs() {
        let txn = builder().build(&scanned("Some Text", "-50.00"), "statement.pdf");

        assert_eq!(txn.flag, '*');
        assert_eq!(txn.narration, "Some Text");
        assert_eq!(txn.meta.lineno, Some(7));
        assert_eq!(txn.postings.len(), 2);
        assert_eq!(txn.postings[0].account, "Assets:Bank:Volksbank");
        assert_eq!(txn.postings[0].units.number, Decimal::from_str("-50.00").unwrap());
        assert_eq!(txn.postings[0].flag, None);
        assert_eq!(txn.postings[1].account, "Expenses:Unklar");
        assert_eq!(txn.postings[1].units.number, Decimal::from_str("50.00").unwrap());
        assert_eq!(txn.postings[1].flag, Some('!'));
        assert!(txn.is_balanced());
    }

    #[test]
    fn test_rule_rewrites_counter_leg() {
        let rules = NarrationRules::new(vec![NarrationRule::contains(
            "Some defining text",
            Rewrite {
                narration: Some("Overwrite purpose".to_string()),
                account: Some("Defining:Account".to_string()),
                flag: FlagOverride::Clear,
            },
        )]);
        let b = builder().with_rules(rules).with_flag('!');
        let txn = b.build(&scanned("Gutschrift Some defining text 123", "12.34"), "s.pdf");

        assert_eq!(txn.flag, '!');
        assert_eq!(txn.narration, "Overwrite purpose");
        assert_eq!(txn.postings[1].account, "Defining:Account");
        assert_eq!(txn.postings[1].flag, None);
        assert_eq!(txn.postings[1].units.number, Decimal::from_str("-12.34").unwrap());
        assert!(txn.is_balanced());
    }

    #[test]
    fn test_rule_without_narration_keeps_text() {
        let rules = NarrationRules::new(vec![NarrationRule::contains(
            "Stadtwerke",
            Rewrite {
                account: Some("Expenses:Utilities".to_string()),
                ..Default::default()
            },
        )]);
        let txn = builder().with_rules(rules).build(&scanned("Stadtwerke Siegen", "-80.00"), "s.pdf");
        assert_eq!(txn.narration, "Stadtwerke Siegen");
        assert_eq!(txn.postings[1].account, "Expenses:Utilities");
        assert_eq!(txn.postings[1].flag, Some('!'));
    }
}
