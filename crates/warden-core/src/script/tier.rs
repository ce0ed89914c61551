//! Engine version tiers

use serde::{Deserialize, Serialize};
use std::fmt;
use warden_config::EngineConfig;

/// Bucket of engine versions that share one script tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionTier {
    Legacy,
    Modern,
}

impl VersionTier {
    /// Tier for a reported engine version.
    ///
    /// The version is compared on its first two dotted components, so
    /// `19.3.0.0.0` is `19.3`. A missing or unparseable version selects the
    /// legacy tier.
    pub fn from_version(version: Option<&str>, threshold: EngineVersion) -> Self {
        match version.and_then(EngineVersion::parse) {
            Some(v) if v >= threshold => VersionTier::Modern,
            _ => VersionTier::Legacy,
        }
    }

    /// Directory name of this tier under a namespace
    pub fn dir_name<'a>(&self, engine: &'a EngineConfig) -> &'a str {
        match self {
            VersionTier::Legacy => &engine.legacy_tier_dir,
            VersionTier::Modern => &engine.modern_tier_dir,
        }
    }
}

impl fmt::Display for VersionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionTier::Legacy => f.write_str("legacy"),
            VersionTier::Modern => f.write_str("modern"),
        }
    }
}

/// `major.minor` of an engine release; ordering is numeric per component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
}

impl EngineVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse the first two dotted components; a bare major has minor 0
    pub fn parse(version: &str) -> Option<Self> {
        let mut parts = version.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = match parts.next() {
            Some(minor) => minor.parse().ok()?,
            None => 0,
        };
        Some(Self { major, minor })
    }
}

impl From<(u32, u32)> for EngineVersion {
    fn from((major, minor): (u32, u32)) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
