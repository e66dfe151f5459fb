//! Public facade: wrap units of work so they obey per-tag admission control.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::core::scheduler::{self, Admission, AdmissionOptions, Grant};
use crate::core::{QueueError, QueueRegistry, QueueTag, TaskError, TaskQueue};
use crate::runtime::QueueSnapshot;

/// Limit used for queues nobody configured: one task at a time.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Options of a wrapped unit of work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrapOptions {
    /// Queue to run on. `None` selects the engine's default queue.
    pub tag: Option<QueueTag>,
    /// Fail with the previous task's error instead of running, if it failed.
    pub inherit_pre_err: bool,
    /// Yield to the runtime once before running an immediately admitted call.
    pub non_blocking_admission: bool,
    /// Fail with [`QueueError::QueueFull`] instead of waiting for a slot.
    pub reject_if_full: bool,
}

impl WrapOptions {
    /// Options with every flag off and no tag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run on the queue named by `tag`.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<QueueTag>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set whether to inherit the predecessor's failure.
    #[must_use]
    pub fn inherit_pre_err(mut self, inherit: bool) -> Self {
        self.inherit_pre_err = inherit;
        self
    }

    /// Set whether an immediate admission yields once before running.
    #[must_use]
    pub fn non_blocking_admission(mut self, non_blocking: bool) -> Self {
        self.non_blocking_admission = non_blocking;
        self
    }

    /// Set whether a saturated queue rejects the call.
    #[must_use]
    pub fn reject_if_full(mut self, reject: bool) -> Self {
        self.reject_if_full = reject;
        self
    }

    const fn admission(&self) -> AdmissionOptions {
        AdmissionOptions {
            inherit_pre_err: self.inherit_pre_err,
            non_blocking: self.non_blocking_admission,
            reject_if_full: self.reject_if_full,
        }
    }
}

/// Concurrency limit for one queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcurrencySetting {
    /// Queue to configure. `None` selects the default queue.
    pub tag: Option<QueueTag>,
    /// Maximum number of tasks running at once. Must be at least 1.
    pub limit: usize,
}

impl ConcurrencySetting {
    /// Setting for the default queue.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { tag: None, limit }
    }

    /// Apply the setting to `tag`'s queue instead.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<QueueTag>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), QueueError> {
        if self.limit < 1 {
            return Err(QueueError::InvalidConcurrency { limit: self.limit });
        }
        self.tag.as_ref().map_or(Ok(()), QueueTag::validate)
    }
}

/// Admission-controlled engine with its own queue registry.
///
/// ```
/// use prometheus_tag_queue::{Engine, WrapOptions};
///
/// # tokio_test_block_on(async {
/// let engine = Engine::new();
/// let add = engine
///     .wrap(|(a, b): (i32, i32)| async move { Ok::<_, String>(a + b) }, WrapOptions::new())
///     .unwrap();
/// assert_eq!(add.call((1, 2)).await.unwrap(), 3);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<QueueRegistry>,
    default_limit: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with a fresh registry; unconfigured queues run one task at a time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(QueueRegistry::new()),
            default_limit: DEFAULT_CONCURRENCY,
        }
    }

    /// Engine whose unconfigured queues allow `default_limit` tasks.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidConcurrency`] for a limit of zero.
    pub fn with_default_limit(default_limit: usize) -> Result<Self, QueueError> {
        if default_limit < 1 {
            return Err(QueueError::InvalidConcurrency {
                limit: default_limit,
            });
        }
        Ok(Self {
            default_limit,
            ..Self::new()
        })
    }

    /// Engine with queues seeded from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidConcurrency`] or [`QueueError::InvalidTag`]
    /// for a malformed setting.
    pub fn with_concurrency(settings: &[ConcurrencySetting]) -> Result<Self, QueueError> {
        let engine = Self::new();
        engine.set_concurrency(settings)?;
        Ok(engine)
    }

    /// Registry backing this engine.
    #[must_use]
    pub const fn registry(&self) -> &Arc<QueueRegistry> {
        &self.registry
    }

    /// Limit given to queues created on first use.
    #[must_use]
    pub const fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Create or reconfigure queues.
    ///
    /// Every setting is validated before any is applied.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidConcurrency`] or [`QueueError::InvalidTag`]
    /// for a malformed setting; no queue is touched in that case.
    pub fn set_concurrency(&self, settings: &[ConcurrencySetting]) -> Result<(), QueueError> {
        apply_settings(&self.registry, settings, |tag| {
            Ok(tag.cloned().unwrap_or_else(QueueTag::default_tag))
        })
    }

    /// Wrap `unit` so every call goes through its queue's admission.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidTag`] for an empty tag name.
    pub fn wrap<F>(&self, unit: F, options: WrapOptions) -> Result<Wrapped<F>, QueueError> {
        let tag = match &options.tag {
            Some(tag) => {
                tag.validate()?;
                tag.clone()
            }
            None => QueueTag::default_tag(),
        };
        Ok(Wrapped::new(
            self.registry.get_or_create(&tag, self.default_limit),
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

    /// Snapshot of a queue; `None` selects the default queue.
    #[must_use]
    pub fn snapshot(&self, tag: Option<&QueueTag>) -> Option<QueueSnapshot> {
        let tag = tag.cloned().unwrap_or_else(QueueTag::default_tag);
        self.registry.get(&tag).map(|queue| queue.snapshot())
    }

    /// Snapshots of every queue of this engine.
    #[must_use]
    pub fn snapshots(&self) -> Vec<QueueSnapshot> {
        self.registry.snapshots()
    }
}

/// Validate all settings, then create or reconfigure their queues.
pub(crate) fn apply_settings(
    registry: &QueueRegistry,
    settings: &[ConcurrencySetting],
    resolve: impl Fn(Option<&QueueTag>) -> Result<QueueTag, QueueError>,
) -> Result<(), QueueError> {
    let mut resolved = Vec::with_capacity(settings.len());
    for setting in settings {
        setting.validate()?;
        resolved.push((resolve(setting.tag.as_ref())?, setting.limit));
    }
    for (tag, limit) in &resolved {
        registry.set_concurrency(tag, *limit);
    }
    Ok(())
}

/// A unit of work bound to a queue.
///
/// Admission happens when [`call`](Self::call) is invoked, so calls are
/// queued in the order they are made, whenever their futures get polled.
/// The unit itself is only invoked once a slot is granted.
pub struct Wrapped<F> {
    queue: Arc<TaskQueue>,
    unit: Arc<F>,
    options: AdmissionOptions,
}

impl<F> std::fmt::Debug for Wrapped<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wrapped")
            .field("queue", &self.queue)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<F> Clone for Wrapped<F> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
            unit: Arc::clone(&self.unit),
            options: self.options,
        }
    }
}

impl<F> Wrapped<F> {
    pub(crate) fn new(queue: Arc<TaskQueue>, unit: F, options: &WrapOptions) -> Self {
        Self {
            queue,
            unit: Arc::new(unit),
            options: options.admission(),
        }
    }

    /// Tag of the queue this unit runs on.
    #[must_use]
    pub fn tag(&self) -> &QueueTag {
        self.queue.tag()
    }

    /// Submit one call.
    ///
    /// The returned future resolves to exactly one outcome: the unit's value,
    /// its own error, an inherited failure, or a rejection.
    pub fn call<A, Fut, T, E>(&self, args: A) -> impl Future<Output = Result<T, TaskError<E>>>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let admission = scheduler::admit(&self.queue, self.options);
        run_admitted(admission, Arc::clone(&self.unit), args)
    }
}

async fn run_admitted<F, A, Fut, T, E>(
    admission: Result<Admission, QueueError>,
    unit: Arc<F>,
    args: A,
) -> Result<T, TaskError<E>>
where
    F: Fn(A) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let Grant { permit, inherited } = admission?.granted().await;

    if let Some(inherited) = inherited {
        tracing::debug!(
            tag = %permit.queue().tag(),
            "skipping task after predecessor failure: {}",
            inherited
        );
        permit.release(Some(&inherited as &dyn fmt::Display));
        return Err(TaskError::Inherited(inherited));
    }

    match (*unit)(args).await {
        Ok(value) => {
            permit.release(None);
            Ok(value)
        }
        Err(err) => {
            permit.release(Some(&err as &dyn fmt::Display));
            Err(TaskError::Failed(err))
        }
    }
}
