//! External tool execution
//!
//! Backup managers, loaders and command line clients are run as child
//! processes under a wall-clock limit and tracked in an
//! [`ExecutionRegistry`].

mod command;
mod registry;

pub use command::{ToolCommand, ToolKind};
pub use registry::{
    ExecutionHandle, ExecutionId, ExecutionRecord, ExecutionRegistry, ExecutionStatus,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unsupported tool: '{0}'")]
    UnsupportedTool(String),

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("No execution with id {0}")]
    NotFound(ExecutionId),
}
