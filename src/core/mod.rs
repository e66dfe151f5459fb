//! Admission control: tags, queues, the scheduler, and the public facades.

pub mod engine;
pub mod error;
pub mod registry;
pub(crate) mod scheduler;
pub mod shared;
pub mod tag;
pub mod task_queue;

pub use engine::{ConcurrencySetting, Engine, WrapOptions, Wrapped, DEFAULT_CONCURRENCY};
pub use error::{AppResult, InheritedError, QueueError, TaskError};
pub use registry::QueueRegistry;
pub use shared::SharedScope;
pub use tag::QueueTag;
pub use task_queue::TaskQueue;
