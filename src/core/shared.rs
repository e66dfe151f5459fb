//! Process-wide facade over a shared registry.
//!
//! Unlike [`Engine`](super::Engine), the shared scope has no implicit
//! default queue: every call names its tag, so unrelated modules cannot
//! serialize behind each other by accident.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::core::engine::{apply_settings, ConcurrencySetting, WrapOptions, Wrapped, DEFAULT_CONCURRENCY};
use crate::core::{QueueError, QueueRegistry, QueueTag, TaskError};

/// Tag-required facade over a registry shared by many callers.
#[derive(Debug, Clone)]
pub struct SharedScope {
    registry: Arc<QueueRegistry>,
}

impl SharedScope {
    /// Facade over the process-wide registry.
    #[must_use]
    pub fn global() -> Self {
        Self {
            registry: QueueRegistry::global(),
        }
    }

    /// Facade over an injected registry, e.g. a fresh one per test.
    #[must_use]
    pub const fn with_registry(registry: Arc<QueueRegistry>) -> Self {
        Self { registry }
    }

    /// Registry behind this scope.
    #[must_use]
    pub const fn registry(&self) -> &Arc<QueueRegistry> {
        &self.registry
    }

    /// Wrap `unit` on the queue named in `options`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::MissingTag`] without a tag and
    /// [`QueueError::InvalidTag`] for an empty one.
    pub fn wrap<F>(&self, unit: F, options: WrapOptions) -> Result<Wrapped<F>, QueueError> {
        let tag = require_tag(options.tag.as_ref())?;
        Ok(Wrapped::new(
            self.registry.get_or_create(&tag, DEFAULT_CONCURRENCY),
            unit,
            &options,
        ))
    }

    /// Wrap `unit` and call it once with `args`.
    pub fn apply<F, A, Fut, T, E>(
        &self,
        unit: F,
        options: WrapOptions,
        args: A,
    ) -> impl Future<Output = Result<T, TaskError<E>>>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let submitted = self.wrap(unit, options).map(|wrapped| wrapped.call(args));
        async move {
            match submitted {
                Ok(call) => call.await,
                Err(err) => Err(TaskError::Queue(err)),
            }
        }
    }

    /// Create or reconfigure shared queues; every setting must name a tag.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::MissingTag`], [`QueueError::InvalidTag`] or
    /// [`QueueError::InvalidConcurrency`]; nothing is applied on error.
    pub fn set_concurrency(&self, settings: &[ConcurrencySetting]) -> Result<(), QueueError> {
        apply_settings(&self.registry, settings, require_tag)
    }
}

fn require_tag(tag: Option<&QueueTag>) -> Result<QueueTag, QueueError> {
    let tag = tag.ok_or(QueueError::MissingTag)?;
    tag.validate()?;
    Ok(tag.clone())
}
