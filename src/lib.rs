//! # Prometheus Tag Queue
//!
//! Per-tag concurrency limiting for async units of work.
//!
//! Callers wrap a unit of work with a tag. At most N calls per tag run at
//! once; the rest wait in strict FIFO order and are woken one by one as
//! slots free up. Optionally, a waiting call can take over its
//! predecessor's failure instead of running.
//!
//! ## Key Features
//!
//! - **Per-tag limits**: every tag owns an independent queue, created on first use
//! - **FIFO admission**: waiters of a tag are released strictly in submission order
//! - **Live reconfiguration**: raising a limit admits queued waiters right away
//! - **Error inheritance**: a waiter can fail with the previous task's error
//! - **Bounded admission**: calls can be rejected instead of queued when a tag is full
//! - **Two scopes**: instance-private [`Engine`]s and the process-wide [`SharedScope`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prometheus_tag_queue::{ConcurrencySetting, Engine, WrapOptions};
//!
//! let engine = Engine::with_concurrency(&[ConcurrencySetting::new(4).with_tag("db")])?;
//!
//! let query = engine.wrap(
//!     |sql: String| async move { run_query(&sql).await },
//!     WrapOptions::new().tag("db"),
//! )?;
//!
//! // At most four queries run at once; the rest wait their turn.
//! let rows = query.call("SELECT 1".to_string()).await?;
//!
//! // A follow-up that should not run if the previous write failed.
//! let commit = engine.wrap(
//!     |()| async { commit().await },
//!     WrapOptions::new().tag("db").inherit_pre_err(true),
//! )?;
//! ```
//!
//! For complete examples, see `tests/admission_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Admission control: tags, queues, scheduler, and facades.
pub mod core;
/// Configuration models for engines and queues.
pub mod config;
/// Builders to construct engines from configuration.
pub mod builders;
/// Queue snapshots and listing.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use crate::core::{
    ConcurrencySetting, Engine, InheritedError, QueueError, QueueRegistry, QueueTag, SharedScope,
    TaskError, WrapOptions, Wrapped,
};
