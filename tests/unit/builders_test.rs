//! Tests for builder modules

use prometheus_tag_queue::builders::{build_engine, EngineBuilder};
use prometheus_tag_queue::config::{ConcurrencyConfig, EngineConfig};
use prometheus_tag_queue::{QueueError, QueueTag};

#[test]
fn test_engine_builder_defaults() {
    let builder = EngineBuilder::new();
    assert!(builder.settings().is_empty());
    let engine = builder.build().unwrap();
    assert_eq!(engine.default_limit(), 1);
    assert!(engine.snapshots().is_empty());
}

#[test]
fn test_engine_builder_seeds_queues() {
    let engine = EngineBuilder::new()
        .default_limit(5)
        .concurrency(10)
        .tag_concurrency("db", 2)
        .build()
        .unwrap();
    assert_eq!(engine.default_limit(), 5);
    assert_eq!(engine.snapshot(None).unwrap().limit, 10);
    assert_eq!(engine.snapshot(Some(&QueueTag::name("db"))).unwrap().limit, 2);
}

#[test]
fn test_engine_builder_rejects_zero() {
    let err = EngineBuilder::new().tag_concurrency("db", 0).build().unwrap_err();
    assert_eq!(err, QueueError::InvalidConcurrency { limit: 0 });
    assert!(EngineBuilder::new().default_limit(0).build().is_err());
}

#[test]
fn test_build_engine_from_config() {
    let cfg = EngineConfig {
        default_limit: 3,
        concurrency: vec![ConcurrencyConfig {
            tag: Some("2".into()),
            limit: 100,
        }],
    };
    let engine = build_engine(&cfg).unwrap();
    assert_eq!(engine.default_limit(), 3);
    assert_eq!(engine.snapshot(Some(&QueueTag::name("2"))).unwrap().limit, 100);
    assert!(engine.snapshot(None).is_none());
}
