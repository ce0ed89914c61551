use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use warden_core::{blocking_graph, SessionRecord};

use crate::cli::OutputFormat;
use crate::output;

/// Read a JSON array of session rows
pub fn read_snapshot(path: &Path) -> Result<Vec<SessionRecord>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

pub fn execute(input: &Path, node: Option<i64>, format: OutputFormat) -> Result<()> {
    let records = read_snapshot(input)?;
    let entries = blocking_graph(&records, node);
    println!("{}", output::format_graph(&entries, format)?);
    Ok(())
}
