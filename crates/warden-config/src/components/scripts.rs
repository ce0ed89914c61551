//! Script store configuration
//!
//! Describes the on-disk layout consumed by the script resolver:
//! `<root>/<namespace>/<tier-or-common>/<category>/<name>.sql`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Script store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Root directory of the script store
    pub root: PathBuf,
    /// Namespace holding the versioned script tree
    pub namespace: String,
    /// Reserved namespace for scripts only the console itself may run
    pub internal_namespace: String,
    /// Directory name shared by every tier
    pub common_dir: String,
    /// File extension used when listing and creating scripts
    pub extension: String,
    /// Reserved categories whose scripts may live in a dedicated directory.
    ///
    /// Maps category name to a directory relative to `root`; the resolver
    /// checks the bare file name there after the tier and common lookups.
    pub overrides: BTreeMap<String, PathBuf>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        let mut overrides = BTreeMap::new();
        overrides.insert("backup".to_string(), PathBuf::from("oracle/rman"));

        Self {
            root: PathBuf::from("./sql"),
            namespace: "oracle".to_string(),
            internal_namespace: "internal".to_string(),
            common_dir: "common".to_string(),
            extension: "sql".to_string(),
            overrides,
        }
    }
}
