//! External tool configuration
//!
//! External tools (command line clients, backup managers, loaders) are run as
//! child processes with a wall-clock limit. Finished runs are kept in the
//! execution registry for `retention_seconds` before being pruned.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// External tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub timeout_seconds: u64,
    pub retention_seconds: u64,
    /// Program overrides keyed by tool name (`rman = "/opt/bin/rman"`)
    pub programs: BTreeMap<String, String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            retention_seconds: 3600,
            programs: BTreeMap::new(),
        }
    }
}

impl ToolsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_seconds)
    }

    /// Program to launch for `tool`, falling back to `default`
    pub fn program_for<'a>(&'a self, tool: &str, default: &'a str) -> &'a str {
        self.programs
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tool))
            .map(|(_, program)| program.as_str())
            .unwrap_or(default)
    }
}
