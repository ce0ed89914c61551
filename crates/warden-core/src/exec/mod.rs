//! Multi-statement script execution
//!
//! The [`ExecutionEngine`] splits a script, runs every statement over a
//! single connection and reports one [`StatementResult`] per statement. A
//! failing statement becomes an `Error` result and the batch carries on;
//! only connection and commit failures abort the request.

mod connection;
mod engine;
#[cfg(test)]
pub(crate) mod mock;
mod result;

pub use connection::{ConnectionProvider, EngineConnection, EngineError, EngineReply, RowSet};
pub use engine::ExecutionEngine;
pub use result::{Grid, StatementOutcome, StatementResult};

use crate::script::ScriptError;
use thiserror::Error;

/// Request-level execution failures
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Could not acquire connection: {0}")]
    Connection(#[source] EngineError),

    #[error("Commit failed: {0}")]
    Commit(#[source] EngineError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}
