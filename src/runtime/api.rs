//! API-facing snapshot models.

use serde::{Deserialize, Serialize};

use crate::core::Engine;

/// Point-in-time counters of one queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Queue tag, as displayed.
    pub tag: String,
    /// Concurrency limit.
    pub limit: usize,
    /// Tasks holding a slot.
    pub running: usize,
    /// Parked callers.
    pub waiting: usize,
}

impl QueueSnapshot {
    /// Whether the queue currently has no free slot.
    #[must_use]
    pub const fn is_saturated(&self) -> bool {
        self.running >= self.limit
    }
}

/// Snapshots of every queue of `engine`, sorted by tag.
#[must_use]
pub fn list_queues(engine: &Engine) -> Vec<QueueSnapshot> {
    let mut snapshots = engine.snapshots();
    snapshots.sort_by(|a, b| a.tag.cmp(&b.tag));
    snapshots
}

/// Serialize every queue snapshot of `engine` as JSON.
///
/// # Errors
///
/// Propagates serialization failures.
pub fn queues_json(engine: &Engine) -> Result<String, serde_json::Error> {
    serde_json::to_string(&list_queues(engine))
}
