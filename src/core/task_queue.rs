//! Per-tag admission state: limit, running count, and the FIFO of waiters.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::core::{InheritedError, QueueTag};
use crate::runtime::QueueSnapshot;

/// Payload delivered to a waiter when its slot is granted.
#[derive(Debug)]
pub(crate) struct Wake {
    pub(crate) inherited: Option<InheritedError>,
}

/// A caller parked until a slot frees up.
///
/// Popped from the queue head exactly once; firing consumes it.
#[derive(Debug)]
pub(crate) struct Waiter {
    signal: oneshot::Sender<Wake>,
    inherit_pre_err: bool,
}

impl Waiter {
    pub(crate) fn new(inherit_pre_err: bool) -> (Self, oneshot::Receiver<Wake>) {
        let (signal, rx) = oneshot::channel();
        (
            Self {
                signal,
                inherit_pre_err,
            },
            rx,
        )
    }

    pub(crate) const fn inherits(&self) -> bool {
        self.inherit_pre_err
    }

    /// Fire the wake signal. Returns false when the caller stopped waiting.
    pub(crate) fn fire(self, inherited: Option<InheritedError>) -> bool {
        self.signal.send(Wake { inherited }).is_ok()
    }
}

/// Mutable part of a queue, only touched by the scheduler.
#[derive(Debug)]
pub(crate) struct QueueState {
    pub(crate) limit: usize,
    pub(crate) running: usize,
    pub(crate) waiters: VecDeque<Waiter>,
}

/// A tagged admission unit.
///
/// Queues are created lazily by a [`QueueRegistry`](super::QueueRegistry) and
/// live as long as it does, so reconfiguration always reaches queues that
/// already have callers.
#[derive(Debug)]
pub struct TaskQueue {
    tag: QueueTag,
    pub(crate) state: Mutex<QueueState>,
}

impl TaskQueue {
    pub(crate) fn new(tag: QueueTag, limit: usize) -> Self {
        Self {
            tag,
            state: Mutex::new(QueueState {
                limit,
                running: 0,
                waiters: VecDeque::new(),
            }),
        }
    }

    /// Tag identifying this queue.
    #[must_use]
    pub const fn tag(&self) -> &QueueTag {
        &self.tag
    }

    /// Current concurrency limit.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.state.lock().limit
    }

    /// Number of admitted tasks that have not released yet.
    #[must_use]
    pub fn running(&self) -> usize {
        self.state.lock().running
    }

    /// Number of parked callers.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Point-in-time view of the queue counters.
    #[must_use]
    pub fn snapshot(&self) -> QueueSnapshot {
        let state = self.state.lock();
        QueueSnapshot {
            tag: self.tag.to_string(),
            limit: state.limit,
            running: state.running,
            waiting: state.waiters.len(),
        }
    }
}
