//! Configuration loading for the CLI

use anyhow::{Context, Result};
use std::path::PathBuf;
use warden_config::WardenConfig;

/// Load the config file named on the command line, or discover one, then
/// apply command line overrides
pub fn load(path: Option<PathBuf>, scripts_root: Option<PathBuf>) -> Result<WardenConfig> {
    let mut config = match path {
        Some(path) => WardenConfig::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => WardenConfig::discover().context("Failed to load configuration")?,
    };

    if let Some(root) = scripts_root {
        config.scripts.root = root;
    }
    Ok(config)
}
