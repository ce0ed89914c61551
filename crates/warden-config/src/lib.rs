//! # Warden Configuration Library
//!
//! Typed configuration for the warden console: where the script store lives,
//! how engine versions map onto script tiers, which console directives are
//! stripped before execution, and how external tools are run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warden_config::WardenConfig;
//!
//! let config = WardenConfig::load("warden.toml")?;
//! println!("scripts live in {}", config.scripts.root.display());
//! # Ok::<(), warden_config::ConfigError>(())
//! ```
//!
//! Every section is `#[serde(default)]`, so a partial file only overrides the
//! keys it names.

#![warn(clippy::all)]

pub mod components;
mod error;
mod loader;

pub use components::*;
pub use error::{ConfigError, ConfigResult};
pub use loader::WardenConfig;
