//! Script text pipeline for warden
//!
//! Everything that happens to script text before it reaches a live connection:
//!
//! - [`substitute`] rewrites `$name`, `:name` and `&name` placeholders from a
//!   [`VariableMap`], case-insensitively, leaving compound tokens such as
//!   `v$session` alone.
//! - [`ScriptSplitter`] strips console directives and splits a script into
//!   [`Statement`]s with a quote- and comment-aware scanner, keeping
//!   procedural blocks whole until their `/` terminator.
//! - [`referenced_binds`] picks the variables a statement references through
//!   native `:name` binding.
//!
//! All functions here are pure and never touch I/O.

mod bind;
mod directive;
mod lexer;
mod split;
mod substitute;
mod variables;

pub use bind::{referenced_binds, BindParam};
pub use directive::DirectiveSet;
pub use split::{split_statements, ScriptSplitter, Statement};
pub use substitute::{substitute, substitute_with, Sigil};
pub use variables::VariableMap;
