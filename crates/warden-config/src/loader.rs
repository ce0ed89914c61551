//! Configuration loading and validation

use crate::components::{EngineConfig, ExecutionConfig, LoggingConfig, ScriptsConfig, ToolsConfig};
use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name looked up in the working directory by [`WardenConfig::discover`]
pub const LOCAL_CONFIG_FILE: &str = "warden.toml";

/// Top-level warden configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub scripts: ScriptsConfig,
    pub engine: EngineConfig,
    pub execution: ExecutionConfig,
    pub tools: ToolsConfig,
    pub logging: LoggingConfig,
}

impl WardenConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&contents)?;
        config.resolve_relative_paths(path.parent());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Find a configuration file in the usual places.
    ///
    /// Checks `./warden.toml`, then `<config_dir>/warden/config.toml`, and
    /// falls back to defaults when neither exists.
    pub fn discover() -> ConfigResult<Self> {
        match Self::candidate_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("warden").join("config.toml"));
        }
        paths
    }

    /// Check values the rest of the console relies on
    pub fn validate(&self) -> ConfigResult<()> {
        if self.engine.threshold().is_none() {
            return Err(ConfigError::InvalidValue {
                field: "engine.tier_threshold".to_string(),
                value: self.engine.tier_threshold.clone(),
            });
        }

        let namespace = self.scripts.namespace.trim();
        if namespace.is_empty() || namespace.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "scripts.namespace".to_string(),
                value: self.scripts.namespace.clone(),
            });
        }

        if namespace.eq_ignore_ascii_case(self.scripts.internal_namespace.trim()) {
            return Err(ConfigError::InvalidValue {
                field: "scripts.internal_namespace".to_string(),
                value: format!(
                    "'{}' must differ from scripts.namespace",
                    self.scripts.internal_namespace
                ),
            });
        }

        if self.tools.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tools.timeout_seconds".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }

    /// Relative store paths are taken relative to the config file's directory
    fn resolve_relative_paths(&mut self, base: Option<&Path>) {
        let Some(base) = base.filter(|b| !b.as_os_str().is_empty()) else {
            return;
        };
        if self.scripts.root.is_relative() {
            self.scripts.root = base.join(&self.scripts.root);
        }
    }
}
