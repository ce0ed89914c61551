//! Table and JSON rendering of command results

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;
use warden_core::{ExecutionRecord, Grid, RelationshipEntry, StatementOutcome, StatementResult};

use crate::cli::OutputFormat;

/// Pretty-printed JSON of any serializable result
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn grid_table(grid: &Grid) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(grid.columns.clone());
    for row in &grid.rows {
        table.add_row(row.iter().map(|value| value.to_string()));
    }
    table
}

/// Render statement results, one block per statement
pub fn format_results(results: &[StatementResult], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(results);
    }

    let mut blocks = Vec::with_capacity(results.len());
    for result in results {
        let body = match &result.outcome {
            StatementOutcome::Grid { data } if data.columns.is_empty() => "(no columns)".to_string(),
            StatementOutcome::Grid { data } => {
                format!("{}\n{} row(s)", grid_table(data), data.rows.len())
            }
            StatementOutcome::Message { text, .. } => text.clone(),
            StatementOutcome::Error { message } => format!("ERROR: {message}"),
        };
        blocks.push(format!("-- line {}: {}\n{}", result.line, first_line(&result.sql), body));
    }
    Ok(blocks.join("\n\n"))
}

/// Render blocking chains, indenting blocked sessions under their blocker
pub fn format_graph(entries: &[RelationshipEntry], format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(entries);
    }
    if entries.is_empty() {
        return Ok("No blocking sessions".to_string());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Session", "Role", "Node", "Serial", "Status", "Wait event", "Kill command",
    ]);
    for entry in entries {
        let record = &entry.record;
        table.add_row(vec![
            format!("{}{}", "  ".repeat(entry.depth), record.session_id),
            format!("{:?}", entry.role).to_lowercase(),
            record.node_id.to_string(),
            optional(record.serial),
            record.status.clone().unwrap_or_default(),
            record.wait_event.clone().unwrap_or_default(),
            record.kill_statement().unwrap_or_default(),
        ]);
    }
    Ok(table.to_string())
}

/// Render a finished tool run
pub fn format_execution(record: &ExecutionRecord, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(record);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Field", "Value"]);
    table.add_row(vec!["id".to_string(), record.id.to_string()]);
    table.add_row(vec!["tool".to_string(), record.tool.clone()]);
    table.add_row(vec!["command".to_string(), record.command.clone()]);
    table.add_row(vec!["status".to_string(), format!("{:?}", record.status)]);
    table.add_row(vec!["exit code".to_string(), optional(record.exit_code)]);
    if let Some(error) = &record.error {
        table.add_row(vec!["error".to_string(), error.clone()]);
    }

    let mut out = table.to_string();
    if !record.output.is_empty() {
        out.push('\n');
        out.push_str(record.output.trim_end());
    }
    Ok(out)
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn first_line(sql: &str) -> &str {
    sql.lines().next().unwrap_or_default().trim()
}
