//! Configuration models for engines and their queues.

pub mod engine;

pub use engine::{ConcurrencyConfig, EngineConfig, ENV_CONFIG_PATH, ENV_DEFAULT_LIMIT};
