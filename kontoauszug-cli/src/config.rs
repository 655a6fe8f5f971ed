use anyhow::{Context, Result};
use kontoauszug_finance::{ImporterConfig, NarrationRules, RuleConfig, VolksbankImporter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{ensure_kontoauszug_home, resolve_relative};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub importer: ImporterConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

const EXAMPLE_RULE: &str = r#"
# Narration rules, first match wins:
#
# [[rules]]
# contains = "Some defining text"     # or: matches = "<regex>"
# narration = "Overwrite purpose"
# account = "Defining:Account"
# counter_flag = "none"               # or a single flag character
"#;

impl Config {
    /// Build the importer this config describes. Relative `target_journal`
    /// paths are taken relative to the config file.
    pub fn importer(&self, config_file: &Path) -> Result<VolksbankImporter> {
        let rules = NarrationRules::from_config(&self.rules).context("compile narration rules")?;
        let mut importer_cfg = self.importer.clone();
        importer_cfg.target_journal = importer_cfg
            .target_journal
            .map(|j| resolve_relative(&j, config_file));
        Ok(VolksbankImporter::new(importer_cfg).with_rules(rules))
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(ensure_kontoauszug_home()?.join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let mut s = toml::to_string_pretty(cfg).context("serialize config")?;
    if cfg.rules.is_empty() {
        s.push_str(EXAMPLE_RULE);
    }
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
