use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn kontoauszug_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".kontoauszug"))
}

pub fn ensure_kontoauszug_home() -> Result<PathBuf> {
    let dir = kontoauszug_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Resolve `path` against the directory of the config file it came from.
pub fn resolve_relative(path: &Path, config_file: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    config_file
        .parent()
        .map(|dir| dir.join(path))
        .unwrap_or_else(|| path.to_path_buf())
}
