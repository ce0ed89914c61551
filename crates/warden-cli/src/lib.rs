//! Warden CLI library
//!
//! Argument parsing, configuration loading and output rendering for the
//! `warden` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod output;
