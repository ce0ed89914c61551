//! SQLite engine adapter for warden
//!
//! Implements the warden-core connection traits over rusqlite, so scripts can
//! be run against a local database file.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_core::ExecutionEngine;
//! use warden_sqlite::{SqliteConfig, SqlitePool};
//!
//! let pool = SqlitePool::new(SqliteConfig::new("./warden.db"))?;
//! let results = ExecutionEngine::default()
//!     .execute(&pool, "SELECT 1; SELECT 2;", None, false)
//!     .await?;
//! ```

pub mod config;
pub mod connection;
pub mod error;

// Re-exports
pub use config::SqliteConfig;
pub use connection::{SqlitePool, SqliteSession};
pub use error::{SqliteError, SqliteResult};
