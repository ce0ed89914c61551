//! Error types for the SQLite adapter

use thiserror::Error;
use warden_core::EngineError;

/// SQLite adapter error type
#[derive(Error, Debug)]
pub enum SqliteError {
    /// Database could not be opened or configured
    #[error("Connection error: {0}")]
    Connection(String),

    /// Transaction control failed
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Underlying rusqlite error
    #[error("{0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Result type for SQLite operations
pub type SqliteResult<T> = Result<T, SqliteError>;

impl From<SqliteError> for EngineError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::Connection(msg) => Self::Connection(msg),
            SqliteError::Transaction(msg) => Self::Transaction(msg),
            SqliteError::Rusqlite(e) => Self::Statement(e.to_string()),
        }
    }
}
