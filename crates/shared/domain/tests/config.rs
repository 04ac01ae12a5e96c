use serde_json::json;
use vitrine_domain::config::{
    CacheBackendKind, CacheConfig, RemoteConfig, RetryConfig, SyncConfig, VitrineConfig,
};

#[test]
fn config_defaults_are_sane() {
    let cache = CacheConfig::default();
    assert_eq!(cache.backend, CacheBackendKind::Memory);
    assert_eq!(cache.quota_bytes, 5 * 1024 * 1024);
    assert_eq!(cache.key_prefix, "vitrine:");

    let remote = RemoteConfig::default();
    assert_eq!(remote.url, "mem://");
    assert!(remote.credentials.is_none());

    let sync = SyncConfig::default();
    assert!(sync.strict_schemas);
    assert_eq!(sync.retry.max_attempts, 1, "retrying must be opt-in");
}

#[test]
fn vitrine_config_deserializes() {
    let raw = json!({
        "cache": { "backend": "file", "dir": "/tmp/vitrine", "quota_bytes": 1024 },
        "remote": { "url": "ws://db:8000", "credentials": { "username": "u", "password": "p" } },
        "sync": { "retry": { "max_attempts": 3 } }
    });

    let cfg: VitrineConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.cache.backend, CacheBackendKind::File);
    assert_eq!(cfg.cache.quota_bytes, 1024);
    assert_eq!(cfg.cache.key_prefix, "vitrine:", "missing keys keep their defaults");
    assert_eq!(cfg.remote.credentials.as_ref().map(|c| c.username.as_str()), Some("u"));
    assert_eq!(
        cfg.sync.retry,
        RetryConfig { max_attempts: 3, ..RetryConfig::default() },
        "partial retry tables merge with defaults"
    );
}

#[test]
fn deref_mut_clones_on_write() {
    let original = VitrineConfig::default();
    let mut edited = original.clone();
    edited.cache.quota_bytes = 10;

    assert_eq!(original.cache.quota_bytes, 5 * 1024 * 1024);
    assert_eq!(edited.cache.quota_bytes, 10);
}
