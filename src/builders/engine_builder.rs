//! Builders to construct engines from configuration.

use crate::config::EngineConfig;
use crate::core::{ConcurrencySetting, Engine, QueueError, QueueTag, DEFAULT_CONCURRENCY};

/// Build an engine from configuration, seeding every configured queue.
///
/// # Errors
///
/// Returns the validation error of the first malformed entry.
pub fn build_engine(cfg: &EngineConfig) -> Result<Engine, QueueError> {
    cfg.validate()?;
    let engine = Engine::with_default_limit(cfg.default_limit)?;
    engine.set_concurrency(&cfg.settings())?;
    tracing::info!(
        "engine built with {} seeded queue(s), default concurrency {}",
        cfg.concurrency.len(),
        cfg.default_limit
    );
    Ok(engine)
}

/// Incremental engine construction.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    default_limit: usize,
    settings: Vec<ConcurrencySetting>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Builder with the default limit of one and no seeded queues.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_limit: DEFAULT_CONCURRENCY,
            settings: Vec::new(),
        }
    }

    /// Limit of queues created on first use.
    #[must_use]
    pub fn default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Seed the default queue with `limit`.
    #[must_use]
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.settings.push(ConcurrencySetting::new(limit));
        self
    }

    /// Seed `tag`'s queue with `limit`.
    #[must_use]
    pub fn tag_concurrency(mut self, tag: impl Into<QueueTag>, limit: usize) -> Self {
        self.settings.push(ConcurrencySetting::new(limit).with_tag(tag));
        self
    }

    /// Settings collected so far.
    #[must_use]
    pub fn settings(&self) -> &[ConcurrencySetting] {
        &self.settings
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidConcurrency`] for a zero limit and
    /// [`QueueError::InvalidTag`] for an empty tag.
    pub fn build(self) -> Result<Engine, QueueError> {
        let engine = Engine::with_default_limit(self.default_limit)?;
        engine.set_concurrency(&self.settings)?;
        Ok(engine)
    }
}
