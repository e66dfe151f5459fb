//! Admission scheduler: admit, release, and reconfigure a [`TaskQueue`].
//!
//! A queue's counters are mutated only here, always under its mutex and
//! never across an `.await`. A freed slot is handed straight to the next
//! waiter (the releaser bumps `running` on its behalf), so a caller that
//! arrives between release and wake-up can never overtake the FIFO.

use std::fmt;
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::core::task_queue::{QueueState, Waiter, Wake};
use crate::core::{InheritedError, QueueError, QueueTag, TaskQueue};

/// Per-call admission policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmissionOptions {
    /// Take over the predecessor's failure instead of running.
    pub inherit_pre_err: bool,
    /// Yield to the runtime once after an immediate admission.
    pub non_blocking: bool,
    /// Fail with [`QueueError::QueueFull`] instead of waiting.
    pub reject_if_full: bool,
}

/// Result of asking a queue for a slot.
#[derive(Debug)]
pub enum Admission {
    /// A slot was reserved on the spot.
    Immediate {
        /// The reserved slot.
        permit: SlotPermit,
        /// Yield once before running.
        yield_first: bool,
    },
    /// The caller is parked at the tail of the queue.
    Queued(QueuedAdmission),
}

/// A granted slot, plus the predecessor's failure if it was handed over.
#[derive(Debug)]
pub struct Grant {
    /// The slot held by this caller.
    pub permit: SlotPermit,
    /// Failure inherited from the previous task, if any.
    pub inherited: Option<InheritedError>,
}

impl Admission {
    /// Wait until the slot is actually granted.
    pub async fn granted(self) -> Grant {
        match self {
            Self::Immediate {
                permit,
                yield_first,
            } => {
                if yield_first {
                    tokio::task::yield_now().await;
                }
                Grant {
                    permit,
                    inherited: None,
                }
            }
            Self::Queued(queued) => queued.wait().await,
        }
    }
}

/// A parked caller's side of a [`Waiter`].
///
/// Dropping it before the wake fires makes the scheduler skip the waiter;
/// dropping it after the wake fired gives the slot back.
#[derive(Debug)]
pub struct QueuedAdmission {
    queue: Arc<TaskQueue>,
    signal: Option<oneshot::Receiver<Wake>>,
}

impl QueuedAdmission {
    async fn wait(mut self) -> Grant {
        let received = match self.signal.as_mut() {
            Some(signal) => signal.await.ok(),
            None => None,
        };
        self.signal = None;
        // The sender sits in the queue this admission keeps alive, and is only
        // dropped unsent once the receiver is gone.
        let Some(wake) = received else {
            unreachable!("waiter on queue {} dropped without a wake", self.queue.tag());
        };
        tracing::debug!(tag = %self.queue.tag(), "waiter woken");
        Grant {
            permit: SlotPermit::new(Arc::clone(&self.queue)),
            inherited: wake.inherited,
        }
    }
}

impl Drop for QueuedAdmission {
    fn drop(&mut self) {
        if let Some(mut signal) = self.signal.take() {
            signal.close();
            if signal.try_recv().is_ok() {
                tracing::debug!(tag = %self.queue.tag(), "woken waiter abandoned, returning slot");
                release(&self.queue, None);
            }
        }
    }
}

/// An occupied slot of a queue.
///
/// Released explicitly with the task's outcome, or on drop as a success.
#[derive(Debug)]
pub struct SlotPermit {
    queue: Arc<TaskQueue>,
    armed: bool,
}

impl SlotPermit {
    const fn new(queue: Arc<TaskQueue>) -> Self {
        Self { queue, armed: true }
    }

    /// Queue this slot belongs to.
    #[must_use]
    pub fn queue(&self) -> &Arc<TaskQueue> {
        &self.queue
    }

    /// Give the slot back, passing the task's failure to the next waiter.
    pub fn release(mut self, failure: Option<&dyn fmt::Display>) {
        self.armed = false;
        release(&self.queue, failure);
    }
}

impl Drop for SlotPermit {
    fn drop(&mut self) {
        if self.armed {
            release(&self.queue, None);
        }
    }
}

/// Reserve a slot now or park the caller at the tail of the queue.
///
/// # Errors
///
/// Returns [`QueueError::QueueFull`] when the queue is saturated and
/// `reject_if_full` is set. The queue is left untouched in that case.
pub(crate) fn admit(queue: &Arc<TaskQueue>, options: AdmissionOptions) -> Result<Admission, QueueError> {
    let mut state = queue.state.lock();

    if state.running < state.limit {
        state.running += 1;
        tracing::debug!(
            tag = %queue.tag(),
            running = state.running,
            limit = state.limit,
            "admitted immediately"
        );
        return Ok(Admission::Immediate {
            permit: SlotPermit::new(Arc::clone(queue)),
            yield_first: options.non_blocking,
        });
    }

    if options.reject_if_full {
        tracing::warn!(
            "task rejected: queue {} full (running={}, limit={})",
            queue.tag(),
            state.running,
            state.limit
        );
        return Err(QueueError::QueueFull {
            tag: queue.tag().clone(),
        });
    }

    let (waiter, signal) = Waiter::new(options.inherit_pre_err);
    state.waiters.push_back(waiter);
    tracing::debug!(
        tag = %queue.tag(),
        waiting = state.waiters.len(),
        "task enqueued"
    );
    Ok(Admission::Queued(QueuedAdmission {
        queue: Arc::clone(queue),
        signal: Some(signal),
    }))
}

/// Return a slot and wake the next waiter(s) that now fit.
///
/// `failure` is the finished task's error; the first waiter woken receives
/// it as an [`InheritedError`] when it asked to inherit.
pub(crate) fn release(queue: &TaskQueue, failure: Option<&dyn fmt::Display>) {
    let mut state = queue.state.lock();
    state.running = state.running.saturating_sub(1);
    let woken = dispatch(queue.tag(), &mut state, failure);
    tracing::debug!(
        tag = %queue.tag(),
        running = state.running,
        woken,
        "slot released"
    );
}

/// Change a queue's limit and admit any waiters the new limit makes room for.
///
/// Lowering the limit never preempts running tasks. Returns the number of
/// waiters woken.
pub(crate) fn set_limit(queue: &TaskQueue, limit: usize) -> usize {
    let mut state = queue.state.lock();
    let previous = state.limit;
    state.limit = limit;
    let woken = dispatch(queue.tag(), &mut state, None);
    tracing::info!(
        "queue {} concurrency {} -> {} (woke {})",
        queue.tag(),
        previous,
        limit,
        woken
    );
    woken
}

fn dispatch(tag: &QueueTag, state: &mut QueueState, mut failure: Option<&dyn fmt::Display>) -> usize {
    let mut woken = 0;
    while state.running < state.limit {
        let Some(waiter) = state.waiters.pop_front() else {
            break;
        };
        let inherited = match failure {
            Some(err) if waiter.inherits() => {
                Some(InheritedError::new(tag.clone(), err.to_string()))
            }
            _ => None,
        };
        if waiter.fire(inherited) {
            state.running += 1;
            woken += 1;
            // Only the direct successor sees the failure.
            failure = None;
        } else {
            tracing::warn!(tag = %tag, "skipped waiter that stopped waiting");
        }
    }
    woken
}
