//! Tests for configuration validation

use std::collections::HashMap;

use prometheus_tag_queue::config::{ConcurrencyConfig, EngineConfig, ENV_CONFIG_PATH, ENV_DEFAULT_LIMIT};
use prometheus_tag_queue::{QueueError, QueueTag};

#[test]
fn test_engine_config_defaults() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.default_limit, 1);
    assert!(cfg.concurrency.is_empty());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_engine_config_invalid_limit() {
    let cfg = EngineConfig {
        default_limit: 1,
        concurrency: vec![ConcurrencyConfig { tag: None, limit: 0 }],
    };
    assert_eq!(cfg.validate(), Err(QueueError::InvalidConcurrency { limit: 0 }));
}

#[test]
fn test_engine_config_invalid_default_limit() {
    let cfg = EngineConfig {
        default_limit: 0,
        concurrency: Vec::new(),
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_engine_config_empty_tag() {
    let cfg = EngineConfig {
        default_limit: 1,
        concurrency: vec![ConcurrencyConfig {
            tag: Some(String::new()),
            limit: 3,
        }],
    };
    assert!(matches!(cfg.validate(), Err(QueueError::InvalidTag(_))));
}

#[test]
fn test_engine_config_from_json() {
    let json = r#"{
        "concurrency": [
            { "limit": 100 },
            { "tag": "2", "limit": 1 }
        ]
    }"#;

    let cfg = EngineConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.default_limit, 1);
    let settings = cfg.settings();
    assert_eq!(settings.len(), 2);
    assert_eq!(settings[0].tag, None);
    assert_eq!(settings[1].tag, Some(QueueTag::name("2")));
}

#[test]
fn test_engine_config_rejects_negative_and_non_numeric_limits() {
    for json in [
        r#"{ "concurrency": [{ "limit": -100 }] }"#,
        r#"{ "concurrency": [{ "limit": "11" }] }"#,
        r#"{ "concurrency": [{ "tag": "x" }] }"#,
    ] {
        assert!(matches!(
            EngineConfig::from_json_str(json),
            Err(QueueError::InvalidConfig(_))
        ));
    }
}

#[test]
fn test_engine_config_from_env_default_limit() {
    let env: HashMap<&str, &str> = HashMap::from([(ENV_DEFAULT_LIMIT, " 8 ")]);
    let cfg = EngineConfig::from_env_with(|key| env.get(key).map(|v| (*v).to_string())).unwrap();
    assert_eq!(cfg.default_limit, 8);
}

#[test]
fn test_engine_config_from_env_bad_limit() {
    let env: HashMap<&str, &str> = HashMap::from([(ENV_DEFAULT_LIMIT, "many")]);
    assert!(EngineConfig::from_env_with(|key| env.get(key).map(|v| (*v).to_string())).is_err());
}

#[test]
fn test_engine_config_from_env_file() {
    let path = std::env::temp_dir().join(format!("tag-queue-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "default_limit": 4, "concurrency": [{ "tag": "db", "limit": 2 }] }"#)
        .unwrap();
    let path_str = path.to_string_lossy().into_owned();

    let cfg = EngineConfig::from_env_with(|key| (key == ENV_CONFIG_PATH).then(|| path_str.clone())).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(cfg.default_limit, 4);
    assert_eq!(cfg.concurrency[0].tag.as_deref(), Some("db"));
}

#[test]
fn test_engine_config_missing_file() {
    let err = EngineConfig::from_path("/nonexistent/tag-queue.json").unwrap_err();
    assert!(err.to_string().contains("reading engine config"));
}
