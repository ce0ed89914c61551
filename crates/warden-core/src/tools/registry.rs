//! Registry of external tool runs
//!
//! Each run gets an [`ExecutionRecord`] the moment it starts. A background
//! task waits for the child under the configured wall-clock limit and fills
//! in the outcome. Finished records stay queryable until pruned.

use super::{ToolCommand, ToolError};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::process::Output;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;
use warden_config::ToolsConfig;

pub type ExecutionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Running,
    Finished,
    Failed,
    TimedOut,
}

impl ExecutionStatus {
    pub fn is_done(self) -> bool {
        self != ExecutionStatus::Running
    }
}

/// State of one external tool run
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionRecord {
    pub id: ExecutionId,
    pub tool: String,
    /// Command line with credentials masked
    pub command: String,
    pub status: ExecutionStatus,
    pub exit_code: Option<i32>,
    /// Standard output followed by standard error
    pub output: String,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

struct Entry {
    record: ExecutionRecord,
    finished: Option<Instant>,
}

/// Handle to a run started with [`ExecutionRegistry::start`]
#[derive(Debug)]
pub struct ExecutionHandle {
    id: ExecutionId,
    task: JoinHandle<()>,
}

impl ExecutionHandle {
    pub fn id(&self) -> ExecutionId {
        self.id
    }

    /// Wait until the run's record has its final status
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            warn!(id = %self.id, error = %e, "Tool completion task failed");
        }
    }
}

/// Tracks running and recently finished tool executions
#[derive(Clone)]
pub struct ExecutionRegistry {
    entries: Arc<RwLock<HashMap<ExecutionId, Entry>>>,
    timeout: Duration,
    retention: Duration,
}

impl ExecutionRegistry {
    pub fn new(timeout: Duration, retention: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            timeout,
            retention,
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(config.timeout(), config.retention())
    }

    /// Spawn `command` and register it as running.
    ///
    /// Must be called from within a Tokio runtime. The child is killed if it
    /// outlives the registry's timeout.
    pub fn start(&self, command: ToolCommand) -> Result<ExecutionHandle, ToolError> {
        let child = command
            .to_command()
            .spawn()
            .map_err(|source| ToolError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        let id = Uuid::new_v4();
        let record = ExecutionRecord {
            id,
            tool: command.tool.clone(),
            command: command.display_line(),
            status: ExecutionStatus::Running,
            exit_code: None,
            output: String::new(),
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        };
        self.entries.write().insert(
            id,
            Entry {
                record,
                finished: None,
            },
        );
        info!(%id, tool = %command.tool, command = %command.display_line(), "Started external tool");

        let registry = self.clone();
        let timeout = self.timeout;
        let task = tokio::spawn(async move {
            let outcome = tokio::time::timeout(timeout, child.wait_with_output()).await;
            registry.complete(id, outcome.ok());
        });

        Ok(ExecutionHandle { id, task })
    }

    /// Start `command` and wait for its final record
    pub async fn run(&self, command: ToolCommand) -> Result<ExecutionRecord, ToolError> {
        let handle = self.start(command)?;
        let id = handle.id();
        handle.wait().await;
        self.status(id).ok_or(ToolError::NotFound(id))
    }

    pub fn status(&self, id: ExecutionId) -> Option<ExecutionRecord> {
        self.entries.read().get(&id).map(|e| e.record.clone())
    }

    /// All known runs, oldest first
    pub fn list(&self) -> Vec<ExecutionRecord> {
        let mut records: Vec<ExecutionRecord> = self
            .entries
            .read()
            .values()
            .map(|e| e.record.clone())
            .collect();
        records.sort_by_key(|r| r.started_at);
        records
    }

    /// Drop finished runs older than the retention period; returns how many
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, e| {
            e.finished
                .map_or(true, |at| now.saturating_duration_since(at) < self.retention)
        });
        let pruned = before - entries.len();
        if pruned > 0 {
            info!(pruned, "Pruned finished tool executions");
        }
        pruned
    }

    /// `None` means the timeout elapsed
    fn complete(&self, id: ExecutionId, outcome: Option<std::io::Result<Output>>) {
        let (status, exit_code, output, error) = match outcome {
            Some(Ok(out)) => {
                let status = if out.status.success() {
                    ExecutionStatus::Finished
                } else {
                    ExecutionStatus::Failed
                };
                (status, out.status.code(), combined_output(&out), None)
            }
            Some(Err(e)) => (ExecutionStatus::Failed, None, String::new(), Some(e.to_string())),
            None => (
                ExecutionStatus::TimedOut,
                None,
                String::new(),
                Some(format!("timed out after {}s", self.timeout.as_secs_f64())),
            ),
        };

        match status {
            ExecutionStatus::Finished => info!(%id, ?exit_code, "External tool finished"),
            _ => warn!(%id, ?status, ?exit_code, error = ?error, "External tool did not succeed"),
        }

        let mut entries = self.entries.write();
        if let Some(entry) = entries.get_mut(&id) {
            entry.record.status = status;
            entry.record.exit_code = exit_code;
            entry.record.output = output;
            entry.record.error = error;
            entry.record.finished_at = Some(Utc::now());
            entry.finished = Some(Instant::now());
        }
    }
}

fn combined_output(out: &Output) -> String {
    let mut text = String::from_utf8_lossy(&out.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&out.stderr);
    if !stderr.trim().is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}
