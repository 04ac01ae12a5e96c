use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared across the content services.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VitrineConfigInner {
    pub cache: CacheConfig,
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct VitrineConfig {
    #[serde(flatten, default)]
    inner: Arc<VitrineConfigInner>,
}

impl Deref for VitrineConfig {
    type Target = VitrineConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for VitrineConfig {
    fn deref_mut(&mut self) -> &mut VitrineConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    /// Process memory; lost on exit.
    #[default]
    Memory,
    /// One file per entry under [`CacheConfig::dir`].
    File,
}

/// Local cache store settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,
    pub dir: PathBuf,
    /// Ceiling for the sum of key and value sizes, in bytes.
    pub quota_bytes: u64,
    pub key_prefix: String,
    /// LZ4-compress file entries on disk (file backend only).
    pub compression: bool,
}

/// Remote content store connection (`SurrealDB`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub credentials: Option<RemoteCredentials>,
    /// Health probes performed while connecting. Content reads and writes never retry.
    pub health_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteCredentials {
    pub username: String,
    pub password: String,
}

/// Write path settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Reject saves to domains without a registered shape.
    pub strict_schemas: bool,
    pub retry: RetryConfig,
}

/// Remote write retry policy. `max_attempts = 1` disables retrying.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub multiplier: f64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: Option<String>,
    pub json: bool,
    pub dir: Option<PathBuf>,
}

// --- Default ---

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            dir: PathBuf::from("cache"),
            quota_bytes: 5 * 1024 * 1024,
            key_prefix: "vitrine:".to_owned(),
            compression: false,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: "mem://".to_owned(),
            namespace: "vitrine".to_owned(),
            database: "site".to_owned(),
            credentials: None,
            health_retries: 3,
        }
    }
}

impl Default for RemoteCredentials {
    fn default() -> Self {
        Self { username: "root".to_owned(), password: "root".to_owned() }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { strict_schemas: true, retry: RetryConfig::default() }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: 1, initial_backoff_ms: 250, multiplier: 2.0, max_backoff_ms: 5_000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), filter: None, json: false, dir: None }
    }
}
