//! Session snapshot rows

use crate::exec::Grid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Node assumed for snapshots taken without an instance column
const SINGLE_NODE: i64 = 1;

const NODE_COLUMNS: &[&str] = &["node_id", "inst_id", "instance_id", "instance"];
const SESSION_COLUMNS: &[&str] = &["session_id", "sid"];
const BLOCKING_NODE_COLUMNS: &[&str] = &["blocking_node_id", "blocking_instance", "blocking_inst_id"];
const BLOCKING_SESSION_COLUMNS: &[&str] = &["blocking_session_id", "blocking_session"];
const SERIAL_COLUMNS: &[&str] = &["serial", "serial#"];
const STATUS_COLUMNS: &[&str] = &["status"];
const WAIT_EVENT_COLUMNS: &[&str] = &["wait_event", "event"];

/// Composite key of a session within a cluster-wide snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub node_id: i64,
    pub session_id: i64,
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.session_id, self.node_id)
    }
}

/// One row of a session snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(alias = "inst_id", alias = "instance_id", alias = "instance", alias = "nodeId")]
    pub node_id: i64,
    #[serde(alias = "sid", alias = "sessionId")]
    pub session_id: i64,
    #[serde(
        default,
        alias = "blocking_instance",
        alias = "blocking_inst_id",
        alias = "blockingNodeId"
    )]
    pub blocking_node_id: Option<i64>,
    #[serde(default, alias = "blocking_session", alias = "blockingSessionId")]
    pub blocking_session_id: Option<i64>,
    #[serde(default, alias = "serial#")]
    pub serial: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "event", alias = "waitEvent")]
    pub wait_event: Option<String>,
    /// Any other columns of the snapshot, passed through for display
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl SessionRecord {
    pub fn new(node_id: i64, session_id: i64) -> Self {
        Self {
            node_id,
            session_id,
            blocking_node_id: None,
            blocking_session_id: None,
            serial: None,
            status: None,
            wait_event: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Mark this session as waiting on `(node, session)`
    pub fn blocked_by(mut self, node_id: i64, session_id: i64) -> Self {
        self.blocking_node_id = Some(node_id);
        self.blocking_session_id = Some(session_id);
        self
    }

    pub fn key(&self) -> SessionKey {
        SessionKey {
            node_id: self.node_id,
            session_id: self.session_id,
        }
    }

    /// Key of the blocking session.
    ///
    /// A blocker reported without a node is taken to be on this session's
    /// own node.
    pub fn blocker_key(&self) -> Option<SessionKey> {
        self.blocking_session_id.map(|session_id| SessionKey {
            node_id: self.blocking_node_id.unwrap_or(self.node_id),
            session_id,
        })
    }

    /// Statement that terminates this session, when its serial is known
    pub fn kill_statement(&self) -> Option<String> {
        self.serial.map(|serial| {
            format!(
                "ALTER SYSTEM KILL SESSION '{},{},@{}' IMMEDIATE",
                self.session_id, serial, self.node_id
            )
        })
    }

    /// Map a result grid onto session records.
    ///
    /// Columns are matched by common aliases (`inst_id`, `sid`,
    /// `blocking_session`, `event`, `serial#`, ...). A grid without a node
    /// column is treated as a single-node snapshot. Rows without a usable
    /// session id are skipped. Unrecognised columns become attributes.
    pub fn from_grid(grid: &Grid) -> Result<Vec<SessionRecord>, SnapshotError> {
        let find = |aliases: &[&str]| aliases.iter().find_map(|a| grid.column_index(a));

        let session_col = find(SESSION_COLUMNS).ok_or(SnapshotError::MissingColumn("sid"))?;
        let node_col = find(NODE_COLUMNS);
        let blocking_node_col = find(BLOCKING_NODE_COLUMNS);
        let blocking_session_col = find(BLOCKING_SESSION_COLUMNS);
        let serial_col = find(SERIAL_COLUMNS);
        let status_col = find(STATUS_COLUMNS);
        let event_col = find(WAIT_EVENT_COLUMNS);

        let known = [
            Some(session_col),
            node_col,
            blocking_node_col,
            blocking_session_col,
            serial_col,
            status_col,
            event_col,
        ];

        let mut records = Vec::with_capacity(grid.rows.len());
        for (index, row) in grid.rows.iter().enumerate() {
            let int_at = |col: Option<usize>| col.and_then(|c| row.get(c)).and_then(|v| v.as_i64());
            let text_at = |col: Option<usize>| col.and_then(|c| row.get(c)).and_then(|v| v.as_text());

            let Some(session_id) = int_at(Some(session_col)) else {
                warn!(row = index, "Skipping snapshot row without a session id");
                continue;
            };

            let attributes = grid
                .columns
                .iter()
                .enumerate()
                .filter(|(c, _)| !known.contains(&Some(*c)))
                .filter_map(|(c, name)| {
                    let value = serde_json::to_value(row.get(c)?).ok()?;
                    Some((name.clone(), value))
                })
                .collect();

            records.push(SessionRecord {
                node_id: int_at(node_col).unwrap_or(SINGLE_NODE),
                session_id,
                blocking_node_id: int_at(blocking_node_col),
                blocking_session_id: int_at(blocking_session_col),
                serial: int_at(serial_col),
                status: text_at(status_col),
                wait_event: text_at(event_col),
                attributes,
            });
        }

        Ok(records)
    }
}

/// A grid that cannot be read as a session snapshot
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Session snapshot has no '{0}' column")]
    MissingColumn(&'static str),
}
