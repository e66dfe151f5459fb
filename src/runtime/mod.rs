//! Observability surface over running engines.

pub mod api;

pub use api::{list_queues, queues_json, QueueSnapshot};
