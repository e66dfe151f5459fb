//! Error types for admission, configuration, and task outcomes.

use thiserror::Error;

use crate::core::QueueTag;

/// Errors raised synchronously by admission and configuration calls.
///
/// None of these leave a side effect on queue state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A concurrency limit below one was supplied.
    #[error("invalid queue concurrency: {limit} (must be at least 1)")]
    InvalidConcurrency {
        /// The rejected limit.
        limit: usize,
    },
    /// A tag that cannot identify a queue was supplied.
    #[error("invalid queue tag: {0}")]
    InvalidTag(String),
    /// The shared scope was used without an explicit tag.
    #[error("a queue tag is required when using shared queues")]
    MissingTag,
    /// The queue was at capacity and the call asked to be rejected instead of waiting.
    #[error("queue full: {tag}")]
    QueueFull {
        /// Tag of the saturated queue.
        tag: QueueTag,
    },
    /// Configuration could not be parsed or failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Failure handed over from the preceding task of the same queue.
///
/// Displays exactly the predecessor's message; the type tells it apart from
/// an error the task produced itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InheritedError {
    tag: QueueTag,
    message: String,
}

impl InheritedError {
    pub(crate) fn new(tag: QueueTag, message: String) -> Self {
        Self { tag, message }
    }

    /// Tag of the queue the failure travelled through.
    #[must_use]
    pub const fn tag(&self) -> &QueueTag {
        &self.tag
    }

    /// Message of the original failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome error of a wrapped call.
#[derive(Debug, Error)]
pub enum TaskError<E> {
    /// The call was never admitted.
    #[error(transparent)]
    Queue(#[from] QueueError),
    /// The task was skipped because its predecessor failed.
    #[error(transparent)]
    Inherited(#[from] InheritedError),
    /// The task ran and failed on its own.
    #[error("{0}")]
    Failed(E),
}

impl<E> TaskError<E> {
    /// Whether the task was skipped due to an inherited failure.
    #[must_use]
    pub const fn is_inherited(&self) -> bool {
        matches!(self, Self::Inherited(_))
    }

    /// Whether the call was rejected because its queue was full.
    #[must_use]
    pub const fn is_queue_full(&self) -> bool {
        matches!(self, Self::Queue(QueueError::QueueFull { .. }))
    }

    /// The task's own error, if it ran and failed.
    pub fn into_failure(self) -> Option<E> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
