//! Monitored engine configuration
//!
//! Controls how a reported engine version string is bucketed into a script
//! tier.

use serde::{Deserialize, Serialize};

/// Engine version tiering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lowest `major.minor` version that selects the modern tier
    pub tier_threshold: String,
    /// Directory holding scripts for engines below the threshold
    pub legacy_tier_dir: String,
    /// Directory holding scripts for engines at or above the threshold
    pub modern_tier_dir: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tier_threshold: "12.1".to_string(),
            legacy_tier_dir: "v11g".to_string(),
            modern_tier_dir: "v12c".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parse `tier_threshold` into `(major, minor)`.
    ///
    /// A bare major (`"12"`) is read as `12.0`.
    pub fn threshold(&self) -> Option<(u32, u32)> {
        let mut parts = self.tier_threshold.trim().split('.');
        let major = parts.next()?.trim().parse().ok()?;
        let minor = match parts.next() {
            Some(minor) => minor.trim().parse().ok()?,
            None => 0,
        };
        Some((major, minor))
    }
}
