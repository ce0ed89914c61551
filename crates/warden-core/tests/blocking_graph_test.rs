//! Blocking graph construction from a cluster snapshot

use warden_core::exec::Grid;
use warden_core::sessions::{blocking_graph, build_graph, Role, SessionRecord};
use warden_core::Value;

#[test]
fn three_session_chain() {
    let records = vec![
        SessionRecord::new(1, 10),
        SessionRecord::new(1, 11).blocked_by(1, 10),
        SessionRecord::new(1, 12).blocked_by(1, 11),
    ];

    let entries = build_graph(&records);
    let summary: Vec<(i64, Role, usize)> = entries
        .iter()
        .map(|e| (e.record.session_id, e.role, e.depth))
        .collect();

    assert_eq!(
        summary,
        vec![
            (10, Role::Blocker, 0),
            (11, Role::Blocked, 1),
            (12, Role::Blocked, 2),
        ]
    );
}

fn row(node: i64, sid: i64, serial: i64, blocker: Option<(i64, i64)>, event: &str) -> Vec<Value> {
    let (blocking_node, blocking_session) = match blocker {
        Some((n, s)) => (Value::Integer(n), Value::Integer(s)),
        None => (Value::Null, Value::Null),
    };
    vec![
        Value::Integer(node),
        Value::Integer(sid),
        Value::Integer(serial),
        blocking_node,
        blocking_session,
        Value::from(event),
    ]
}

#[test]
fn grid_snapshot_to_filtered_graph() {
    let grid = Grid {
        columns: vec![
            "inst_id".into(),
            "sid".into(),
            "serial#".into(),
            "blocking_instance".into(),
            "blocking_session".into(),
            "event".into(),
        ],
        rows: vec![
            row(1, 100, 7, None, "SQL*Net message from client"),
            row(2, 200, 9, Some((1, 100)), "enq: TX - row lock contention"),
            row(2, 201, 4, Some((2, 200)), "enq: TX - row lock contention"),
            row(3, 300, 1, None, "db file sequential read"),
        ],
    };

    let records = SessionRecord::from_grid(&grid).unwrap();
    assert_eq!(records.len(), 4);

    let node_two = blocking_graph(&records, Some(2));
    let keys: Vec<(i64, i64, usize)> = node_two
        .iter()
        .map(|e| (e.record.node_id, e.record.session_id, e.depth))
        .collect();
    assert_eq!(keys, vec![(2, 200, 1), (2, 201, 2)]);

    let json = serde_json::to_value(&node_two).unwrap();
    assert_eq!(json[0]["role"], "blocked");
    assert_eq!(json[0]["wait_event"], "enq: TX - row lock contention");
}
