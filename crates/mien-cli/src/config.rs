use anyhow::{Context, Result};
use mien_core::EngineConfig;
use std::path::PathBuf;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "MIEN_CONFIG";

/// Configuration file to use: the `--config` flag, then `MIEN_CONFIG`.
/// `None` means the built-in configuration.
pub fn resolve_path(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        std::env::var(CONFIG_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Load and validate the effective engine configuration.
pub fn load(flag: Option<PathBuf>) -> Result<EngineConfig> {
    match resolve_path(flag) {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => EngineConfig::builtin().context("built-in config is invalid"),
    }
}
