//! Session snapshots and blocking chains

mod graph;
mod record;

pub use graph::{blocking_graph, build_graph, filter_by_node, RelationshipEntry, Role};
pub use record::{SessionKey, SessionRecord, SnapshotError};
