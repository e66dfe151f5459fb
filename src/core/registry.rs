//! Tag → queue registries, instance-private or process-wide.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;

use crate::core::{scheduler, QueueTag, TaskQueue};
use crate::runtime::QueueSnapshot;

static GLOBAL_REGISTRY: LazyLock<Arc<QueueRegistry>> =
    LazyLock::new(|| Arc::new(QueueRegistry::new()));

/// Mapping from tag to queue.
///
/// Queues are never removed, so every caller holding an `Arc<TaskQueue>`
/// observes later reconfiguration. Registries are fully independent: the
/// same tag in two registries names two unrelated queues.
#[derive(Debug, Default)]
pub struct QueueRegistry {
    queues: Mutex<HashMap<QueueTag, Arc<TaskQueue>>>,
}

impl QueueRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry behind [`SharedScope::global`](super::SharedScope::global).
    ///
    /// Created on first use and kept until the process exits.
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Look up the queue for `tag`, creating it with `default_limit` if absent.
    pub fn get_or_create(&self, tag: &QueueTag, default_limit: usize) -> Arc<TaskQueue> {
        let mut queues = self.queues.lock();
        if let Some(queue) = queues.get(tag) {
            return Arc::clone(queue);
        }
        tracing::debug!("creating queue {} with concurrency {}", tag, default_limit);
        let queue = Arc::new(TaskQueue::new(tag.clone(), default_limit));
        queues.insert(tag.clone(), Arc::clone(&queue));
        queue
    }

    /// Look up an existing queue.
    #[must_use]
    pub fn get(&self, tag: &QueueTag) -> Option<Arc<TaskQueue>> {
        self.queues.lock().get(tag).cloned()
    }

    /// Set the limit of `tag`'s queue, creating it if absent.
    ///
    /// Callers validate `limit`; waiters that fit under a raised limit are
    /// admitted right away.
    pub(crate) fn set_concurrency(&self, tag: &QueueTag, limit: usize) {
        let existing = {
            let mut queues = self.queues.lock();
            match queues.get(tag) {
                Some(queue) => Some(Arc::clone(queue)),
                None => {
                    tracing::debug!("creating queue {} with concurrency {}", tag, limit);
                    queues.insert(tag.clone(), Arc::new(TaskQueue::new(tag.clone(), limit)));
                    None
                }
            }
        };
        if let Some(queue) = existing {
            scheduler::set_limit(&queue, limit);
        }
    }

    /// Number of queues created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queues.lock().len()
    }

    /// Whether no queue has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queues.lock().is_empty()
    }

    /// Snapshots of every queue, in no particular order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<QueueSnapshot> {
        let queues: Vec<_> = self.queues.lock().values().cloned().collect();
        queues.iter().map(|queue| queue.snapshot()).collect()
    }
}
