//! # Warden Core
//!
//! Version-aware script resolution and multi-statement execution for a
//! database administration console, plus the session blocking graph.
//!
//! ## Components
//!
//! - [`script`]: the on-disk script store and the resolver that picks the
//!   right file for an engine version
//! - [`exec`]: the execution engine and the connection traits driver crates
//!   implement
//! - [`value`]: result cell values and their transport normalisation
//! - [`sessions`]: session snapshots and blocking chain construction
//! - [`tools`]: external tool runs with a wall-clock limit
//! - [`console`]: the request-level facade tying these together
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use warden_config::WardenConfig;
//! use warden_core::console::{Console, ExecutionRequest};
//! # async fn demo(provider: Arc<dyn warden_core::exec::ConnectionProvider>) -> Result<(), Box<dyn std::error::Error>> {
//! let console = Console::new(&WardenConfig::discover()?, provider);
//! let results = console
//!     .execute(ExecutionRequest::identifier("sessions/active.sql").with_engine_version("19.3"))
//!     .await?;
//! for result in results {
//!     println!("{}", serde_json::to_string(&result)?);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]

pub mod console;
pub mod exec;
pub mod script;
pub mod sessions;
pub mod tools;
pub mod value;

pub use console::{Console, ExecutionRequest, ScriptSource};
pub use exec::{
    ConnectionProvider, EngineConnection, EngineError, EngineReply, ExecutionEngine,
    ExecutionError, Grid, RowSet, StatementOutcome, StatementResult,
};
pub use script::{Access, ScriptError, ScriptResolver, ScriptStore, VersionTier};
pub use sessions::{blocking_graph, build_graph, RelationshipEntry, Role, SessionRecord};
pub use tools::{ExecutionRecord, ExecutionRegistry, ExecutionStatus, ToolCommand, ToolKind};
pub use value::{normalize, Value};
