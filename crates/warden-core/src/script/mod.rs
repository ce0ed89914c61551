//! Script storage and version-aware resolution
//!
//! Scripts live under a single store root laid out as
//! `<root>/<namespace>/<tier-or-common>/<category>/<name>.sql`. The
//! [`ScriptResolver`] turns a logical identifier plus an engine version into
//! one concrete file; the [`ScriptStore`] lists, searches and edits the tree.

mod identifier;
mod resolver;
mod store;
mod tier;

pub use identifier::ScriptIdentifier;
pub use resolver::{Access, ResolvedScript, ScriptResolver};
pub use store::ScriptStore;
pub use tier::{EngineVersion, VersionTier};

use std::path::PathBuf;
use thiserror::Error;

/// Script store and resolution errors
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("Invalid script identifier '{identifier}': {reason}")]
    InvalidIdentifier { identifier: String, reason: String },

    #[error("Access denied to script '{0}'")]
    AccessDenied(String),

    #[error("Script not found: {identifier}")]
    ScriptNotFound {
        identifier: String,
        /// Candidate paths checked, in order
        searched: Vec<PathBuf>,
    },

    #[error("Script already exists: {0}")]
    AlreadyExists(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ScriptResult<T> = Result<T, ScriptError>;

impl ScriptError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScriptError::Io {
            path: path.into(),
            source,
        }
    }
}
