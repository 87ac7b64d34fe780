use anyhow::{Context, Result};
use immigrant_core::StatementConfig;
use std::fs;
use std::path::Path;

/// Load an export layout from TOML, or the built-in default when no file is given.
/// Missing keys keep their defaults.
pub fn load_config(path: Option<&Path>) -> Result<StatementConfig> {
    let Some(p) = path else {
        return Ok(StatementConfig::default());
    };
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: StatementConfig =
        toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", p.display()))?;
    Ok(cfg)
}

pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&StatementConfig::default()).context("serialize config")
}
