//! Blocking relationship graph
//!
//! Rebuilds blocker/blocked chains from a flat snapshot in which sessions
//! point at their blocker by composite key. Records are indexed once and the
//! walk goes by key, so forward references, missing blockers and reference
//! cycles all terminate.

use super::{SessionKey, SessionRecord};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Blocker,
    Blocked,
}

/// A snapshot row placed in the blocking hierarchy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipEntry {
    #[serde(flatten)]
    pub record: SessionRecord,
    pub role: Role,
    /// 0 for a chain head, parent depth + 1 below it
    pub depth: usize,
}

/// Order sessions into blocking chains.
///
/// Sessions that wait on nobody start chains; each is followed depth first by
/// the sessions it blocks, in snapshot order. Sessions never reached that way
/// (their blocker is missing from the snapshot, or they sit on a cycle) start
/// chains of their own afterwards. Chain heads are reported as blockers at
/// depth 0.
///
/// Each composite key is emitted exactly once. A key repeated in the
/// snapshot keeps its first row.
pub fn build_graph(records: &[SessionRecord]) -> Vec<RelationshipEntry> {
    let mut unique: Vec<&SessionRecord> = Vec::with_capacity(records.len());
    let mut seen: HashSet<SessionKey> = HashSet::with_capacity(records.len());
    for record in records {
        if seen.insert(record.key()) {
            unique.push(record);
        } else {
            warn!(key = %record.key(), "Duplicate session in snapshot, keeping the first row");
        }
    }

    let mut dependents: HashMap<SessionKey, Vec<usize>> = HashMap::new();
    for (index, record) in unique.iter().enumerate() {
        if let Some(blocker) = record.blocker_key() {
            dependents.entry(blocker).or_default().push(index);
        }
    }

    let mut walk = Walk {
        records: &unique,
        dependents: &dependents,
        visited: HashSet::with_capacity(unique.len()),
        entries: Vec::with_capacity(unique.len()),
    };

    for (index, record) in unique.iter().enumerate() {
        if record.blocker_key().is_none() {
            walk.descend(index);
        }
    }
    let rooted = walk.entries.len();

    for index in 0..unique.len() {
        walk.descend(index);
    }

    debug!(
        sessions = unique.len(),
        orphaned = walk.entries.len() - rooted,
        "Built blocking graph"
    );
    walk.entries
}

/// Keep entries on `node_id` or blocked from it.
///
/// Applied after [`build_graph`] so depths reflect the whole cluster.
pub fn filter_by_node(entries: Vec<RelationshipEntry>, node_id: i64) -> Vec<RelationshipEntry> {
    entries
        .into_iter()
        .filter(|e| {
            e.record.node_id == node_id
                || e.record.blocker_key().is_some_and(|b| b.node_id == node_id)
        })
        .collect()
}

/// [`build_graph`] followed by an optional [`filter_by_node`]
pub fn blocking_graph(records: &[SessionRecord], node_id: Option<i64>) -> Vec<RelationshipEntry> {
    let entries = build_graph(records);
    match node_id {
        Some(node) => filter_by_node(entries, node),
        None => entries,
    }
}

struct Walk<'a> {
    records: &'a [&'a SessionRecord],
    dependents: &'a HashMap<SessionKey, Vec<usize>>,
    visited: HashSet<SessionKey>,
    entries: Vec<RelationshipEntry>,
}

impl Walk<'_> {
    /// Depth-first walk from `start` over unvisited dependents
    fn descend(&mut self, start: usize) {
        let mut stack = vec![(start, 0usize)];

        while let Some((index, depth)) = stack.pop() {
            let record = self.records[index];
            if !self.visited.insert(record.key()) {
                continue;
            }

            self.entries.push(RelationshipEntry {
                record: record.clone(),
                role: if depth == 0 { Role::Blocker } else { Role::Blocked },
                depth,
            });

            if let Some(children) = self.dependents.get(&record.key()) {
                // reversed so the first dependent is popped first
                for &child in children.iter().rev() {
                    if !self.visited.contains(&self.records[child].key()) {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }
    }
}
