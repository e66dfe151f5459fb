//! Engine configuration structures.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, ConcurrencySetting, QueueError, QueueTag, DEFAULT_CONCURRENCY};

/// Environment variable holding the default concurrency limit.
pub const ENV_DEFAULT_LIMIT: &str = "TAG_QUEUE_DEFAULT_LIMIT";
/// Environment variable holding the path of a JSON configuration file.
pub const ENV_CONFIG_PATH: &str = "TAG_QUEUE_CONFIG";

const fn default_limit() -> usize {
    DEFAULT_CONCURRENCY
}

/// Concurrency limit of one queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    /// Queue tag; omitted for the engine's default queue.
    #[serde(default)]
    pub tag: Option<String>,
    /// Maximum concurrent tasks.
    pub limit: usize,
}

/// Root engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Limit of queues created on first use.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Queues seeded at construction.
    #[serde(default)]
    pub concurrency: Vec<ConcurrencyConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_CONCURRENCY,
            concurrency: Vec::new(),
        }
    }
}

impl ConcurrencyConfig {
    /// Runtime setting for this entry.
    #[must_use]
    pub fn to_setting(&self) -> ConcurrencySetting {
        ConcurrencySetting {
            tag: self.tag.clone().map(QueueTag::from),
            limit: self.limit,
        }
    }
}

impl EngineConfig {
    /// Validate limits and tags.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidConcurrency`] or [`QueueError::InvalidTag`].
    pub fn validate(&self) -> Result<(), QueueError> {
        if self.default_limit == 0 {
            return Err(QueueError::InvalidConcurrency { limit: 0 });
        }
        for entry in &self.concurrency {
            entry.to_setting().validate()?;
        }
        Ok(())
    }

    /// Runtime settings for every seeded queue.
    #[must_use]
    pub fn settings(&self) -> Vec<ConcurrencySetting> {
        self.concurrency.iter().map(ConcurrencyConfig::to_setting).collect()
    }

    /// Parse engine configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::InvalidConfig`] for malformed JSON (including
    /// negative or non-numeric limits) and the validation errors otherwise.
    pub fn from_json_str(input: &str) -> Result<Self, QueueError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| QueueError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not hold a valid configuration.
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading engine config {}", path.display()))?;
        let cfg = Self::from_json_str(&raw)
            .with_context(|| format!("parsing engine config {}", path.display()))?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, after `.env`.
    ///
    /// # Errors
    ///
    /// See [`from_env_with`](Self::from_env_with).
    pub fn from_env() -> AppResult<Self> {
        // A missing .env file is fine.
        let _ = dotenvy::dotenv();
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`.
    ///
    /// `TAG_QUEUE_CONFIG` names a JSON file to start from; `TAG_QUEUE_DEFAULT_LIMIT`
    /// then overrides its default limit.
    ///
    /// # Errors
    ///
    /// Fails when the file is unreadable or invalid, or the limit is not a
    /// positive integer.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut cfg = match lookup(ENV_CONFIG_PATH) {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        if let Some(raw) = lookup(ENV_DEFAULT_LIMIT) {
            cfg.default_limit = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_DEFAULT_LIMIT} must be an integer, got {raw:?}"))?;
        }
        cfg.validate()?;
        tracing::debug!(
            "loaded engine config: default_limit={}, {} seeded queue(s)",
            cfg.default_limit,
            cfg.concurrency.len()
        );
        Ok(cfg)
    }
}
