//! Tests for error types

use prometheus_tag_queue::{QueueError, QueueTag, TaskError};

#[test]
fn test_queue_full_error() {
    let err = QueueError::QueueFull {
        tag: QueueTag::name("test_queue"),
    };
    assert_eq!(format!("{}", err), "queue full: test_queue");
}

#[test]
fn test_invalid_concurrency_error() {
    let err = QueueError::InvalidConcurrency { limit: 0 };
    assert_eq!(
        format!("{}", err),
        "invalid queue concurrency: 0 (must be at least 1)"
    );
}

#[test]
fn test_missing_tag_error() {
    let err = QueueError::MissingTag;
    assert_eq!(
        format!("{}", err),
        "a queue tag is required when using shared queues"
    );
}

#[test]
fn test_task_error_wraps_queue_error() {
    let err: TaskError<String> = QueueError::QueueFull {
        tag: QueueTag::name("q"),
    }
    .into();
    assert!(err.is_queue_full());
    assert!(!err.is_inherited());
    assert_eq!(err.to_string(), "queue full: q");
    assert!(err.into_failure().is_none());
}

#[test]
fn test_task_error_failed_displays_inner() {
    let err: TaskError<String> = TaskError::Failed("some_error".to_string());
    assert_eq!(err.to_string(), "some_error");
    assert_eq!(err.into_failure().as_deref(), Some("some_error"));
}
