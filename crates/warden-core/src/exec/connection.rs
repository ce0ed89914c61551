//! Connection seams between the execution engine and database drivers
//!
//! A driver crate implements [`ConnectionProvider`] to hand out live
//! [`EngineConnection`]s. A connection is released when it is dropped; an
//! implementation must roll back work that was never committed at that point.

use crate::value::Value;
use async_trait::async_trait;
use thiserror::Error;
use warden_query::BindParam;

/// Driver-level failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The connection could not be opened or has been lost
    #[error("Connection error: {0}")]
    Connection(String),

    /// The engine rejected a statement
    #[error("{0}")]
    Statement(String),

    /// Commit or rollback failed
    #[error("Transaction error: {0}")]
    Transaction(String),
}

/// Raw result set as produced by a driver, before normalisation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// What a driver returns for one statement
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    /// The statement produced a result set (possibly empty)
    Rows(RowSet),
    /// The statement completed without a result set
    Done { rows_affected: u64 },
}

/// Source of live connections
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn EngineConnection>, EngineError>;
}

/// One live connection, used by a single request at a time
#[async_trait]
pub trait EngineConnection: Send {
    /// Run one statement with its native bind parameters
    async fn execute(
        &mut self,
        sql: &str,
        binds: &[BindParam],
    ) -> Result<EngineReply, EngineError>;

    async fn commit(&mut self) -> Result<(), EngineError>;

    /// Version string reported by the server, if the driver knows it
    async fn server_version(&mut self) -> Result<Option<String>, EngineError> {
        Ok(None)
    }
}
