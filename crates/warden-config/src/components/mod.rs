//! Configuration components for the warden console
//!
//! One focused struct per concern; `WardenConfig` composes them.

pub mod engine;
pub mod execution;
pub mod logging;
pub mod scripts;
pub mod tools;

pub use engine::*;
pub use execution::*;
pub use logging::*;
pub use scripts::*;
pub use tools::*;
