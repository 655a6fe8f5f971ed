//! Narration rules: rewrite the counter leg of transactions whose purpose
//! text matches.
//!
//! Rules are checked in order and the first match wins; a transaction no rule
//! matches keeps the default counter account and flag.

use kontoauszug_core::{ImportError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub enum Matcher {
    Contains(String),
    Regex(Regex),
}

impl Matcher {
    pub fn is_match(&self, narration: &str) -> bool {
        match self {
            Matcher::Contains(s) => narration.contains(s.as_str()),
            Matcher::Regex(re) => re.is_match(narration),
        }
    }
}

/// What a matching rule does to the counter posting's flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagOverride {
    #[default]
    Keep,
    Clear,
    Set(char),
}

impl FlagOverride {
    pub fn apply(self, flag: Option<char>) -> Option<char> {
        match self {
            FlagOverride::Keep => flag,
            FlagOverride::Clear => None,
            FlagOverride::Set(c) => Some(c),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewrite {
    pub narration: Option<String>,
    pub account: Option<String>,
    pub flag: FlagOverride,
}

#[derive(Debug, Clone)]
pub struct NarrationRule {
    pub name: String,
    pub matcher: Matcher,
    pub rewrite: Rewrite,
}

impl NarrationRule {
    pub fn contains(needle: impl Into<String>, rewrite: Rewrite) -> Self {
        let needle = needle.into();
        Self {
            name: needle.clone(),
            matcher: Matcher::Contains(needle),
            rewrite,
        }
    }
}

/// Ordered rule list handed to the entry builder
#[derive(Debug, Clone, Default)]
pub struct NarrationRules {
    rules: Vec<NarrationRule>,
}

impl NarrationRules {
    pub fn new(rules: Vec<NarrationRule>) -> Self {
        Self { rules }
    }

    /// Compile rules as written in the config file.
    pub fn from_config(configs: &[RuleConfig]) -> Result<Self> {
        let rules = configs
            .iter()
            .map(NarrationRule::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn first_match(&self, narration: &str) -> Option<&NarrationRule> {
        self.rules.iter().find(|r| r.matcher.is_match(narration))
    }
}

/// A rule as it appears in `config.toml`:
///
/// ```toml
/// [[rules]]
/// contains = "Some defining text"
/// narration = "Overwrite purpose"
/// account = "Defining:Account"
/// counter_flag = "none"
/// ```
///
/// Exactly one of `contains` / `matches` (a regex) selects transactions.
/// `counter_flag` is `"none"` to drop the flag or a single flag character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counter_flag: Option<String>,
}

fn parse_flag_override(rule: &str, raw: Option<&str>) -> Result<FlagOverride> {
    let Some(raw) = raw else {
        return Ok(FlagOverride::Keep);
    };
    if raw.eq_ignore_ascii_case("none") {
        return Ok(FlagOverride::Clear);
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() => Ok(FlagOverride::Set(c)),
        _ => Err(ImportError::InvalidRule {
            rule: rule.to_string(),
            message: format!("counter_flag must be \"none\" or one character, got {:?}", raw),
        }),
    }
}

impl TryFrom<&RuleConfig> for NarrationRule {
    type Error = ImportError;

    fn try_from(cfg: &RuleConfig) -> Result<Self> {
        let fallback_name = cfg.contains.as_deref().or(cfg.matches.as_deref()).unwrap_or("<unnamed>");
        let name = cfg.name.clone().unwrap_or_else(|| fallback_name.to_string());
        let invalid = |message: String| ImportError::InvalidRule {
            rule: name.clone(),
            message,
        };

        let matcher = match (&cfg.contains, &cfg.matches) {
            (Some(needle), None) if !needle.is_empty() => Matcher::Contains(needle.clone()),
            (None, Some(pattern)) => Matcher::Regex(
                Regex::new(pattern).map_err(|e| invalid(e.to_string()))?,
            ),
            (Some(_), Some(_)) => return Err(invalid("set either contains or matches, not both".to_string())),
            _ => return Err(invalid("a non-empty contains or matches is required".to_string())),
        };

        let flag = parse_flag_override(&name, cfg.counter_flag.as_deref())?;

        Ok(NarrationRule {
            name,
            matcher,
            rewrite: Rewrite {
                narration: cfg.narration.clone(),
                account: cfg.account.clone(),
                flag,
            },
        })
    }
}
