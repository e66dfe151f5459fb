//! Tests for queue snapshots

use prometheus_tag_queue::runtime::{list_queues, queues_json, QueueSnapshot};
use prometheus_tag_queue::{ConcurrencySetting, Engine};

#[test]
fn test_list_queues_sorted_by_tag() {
    let engine = Engine::with_concurrency(&[
        ConcurrencySetting::new(3).with_tag("b"),
        ConcurrencySetting::new(2).with_tag("a"),
    ])
    .unwrap();

    let tags: Vec<_> = list_queues(&engine).into_iter().map(|s| s.tag).collect();
    assert_eq!(tags, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn test_queues_json() {
    let engine = Engine::with_concurrency(&[ConcurrencySetting::new(4).with_tag("db")]).unwrap();
    let json = queues_json(&engine).unwrap();
    let parsed: Vec<QueueSnapshot> = serde_json::from_str(&json).unwrap();
    assert_eq!(
        parsed,
        vec![QueueSnapshot {
            tag: "db".into(),
            limit: 4,
            running: 0,
            waiting: 0,
        }]
    );
}

#[test]
fn test_snapshot_saturation() {
    let snapshot = QueueSnapshot {
        tag: "q".into(),
        limit: 1,
        running: 1,
        waiting: 0,
    };
    assert!(snapshot.is_saturated());
}
