//! Facade crate for Vitrine content services.
//! Re-exports the domain, kernel and feature crates and wires them together from a
//! [`VitrineConfig`]. Keep this crate thin: it composes other crates, it does not implement
//! content logic.
//!
//! ## Usage
//! ```rust
//! use vitrine::ContentService;
//! use vitrine::domain::config::VitrineConfig;
//! use vitrine::domain::{KnownDomain, LanguageCode};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), vitrine::InitError> {
//! let service = ContentService::offline(&VitrineConfig::default())?;
//! let home = service.resolver.resolve(&KnownDomain::Homepage.domain(), LanguageCode::En).await;
//! assert!(!home.is_empty());
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::{InitError, InitErrorExt};
pub use vitrine_content as content;
pub use vitrine_database as database;
pub use vitrine_domain as domain;
pub use vitrine_event_bus as events;
pub use vitrine_kernel as kernel;
pub use vitrine_storage as storage;
pub use vitrine_translation as translation;

use tracing::info;
use vitrine_content::{
    ContentBus, ContentResolver, DefaultCatalog, PreviewOverlay, RetryPolicy, SchemaRegistry,
    Synchronizer,
};
use vitrine_database::{AnyContentStore, MemoryContentStore, SurrealContentStore};
use vitrine_domain::config::VitrineConfig;
use vitrine_storage::LocalCacheStore;

/// Every tier handle, constructed once and shared by the resolver and the synchronizer.
///
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct ContentService {
    pub bus: ContentBus,
    pub local: LocalCacheStore,
    pub remote: AnyContentStore,
    pub preview: PreviewOverlay,
    pub catalog: DefaultCatalog,
    pub schemas: SchemaRegistry,
    pub resolver: ContentResolver<AnyContentStore>,
    pub sync: Synchronizer<AnyContentStore>,
}

impl ContentService {
    /// Connects to the configured remote store and opens the local cache.
    ///
    /// # Errors
    /// [`InitError::Storage`] if the cache cannot be opened, [`InitError::Remote`] if the
    /// remote store cannot be reached.
    pub async fn connect(config: &VitrineConfig) -> Result<Self, InitError> {
        let remote = SurrealContentStore::from_config(&config.remote)
            .await
            .context(config.remote.url.clone())?;
        Self::with_remote(config, remote)
    }

    /// Uses an in-process remote store; nothing leaves the process.
    ///
    /// # Errors
    /// [`InitError::Storage`] if the cache cannot be opened.
    pub fn offline(config: &VitrineConfig) -> Result<Self, InitError> {
        Self::with_remote(config, MemoryContentStore::new())
    }

    /// Wires the tiers around an already constructed remote store.
    ///
    /// # Errors
    /// [`InitError::Storage`] if the cache cannot be opened.
    pub fn with_remote(
        config: &VitrineConfig,
        remote: impl Into<AnyContentStore>,
    ) -> Result<Self, InitError> {
        let remote = remote.into();
        let local = LocalCacheStore::from_config(&config.cache).context("Opening local cache")?;
        let bus = ContentBus::new();
        let preview = PreviewOverlay::new(bus.clone());
        let catalog = DefaultCatalog::builtin();
        let schemas = SchemaRegistry::new(config.sync.strict_schemas);

        let resolver = ContentResolver::new(
            preview.clone(),
            local.clone(),
            remote.clone(),
            catalog.clone(),
            schemas.clone(),
        );
        let sync = Synchronizer::new(
            remote.clone(),
            local.clone(),
            bus.clone(),
            catalog.clone(),
            schemas.clone(),
        )
        .with_retry(RetryPolicy::from(config.sync.retry));

        info!(
            backend = ?config.cache.backend,
            remote = remote_kind(&remote),
            strict_schemas = schemas.is_strict(),
            "Content service ready"
        );

        Ok(Self { bus, local, remote, preview, catalog, schemas, resolver, sync })
    }
}

const fn remote_kind(remote: &AnyContentStore) -> &'static str {
    match remote {
        AnyContentStore::Surreal(_) => "surrealdb",
        AnyContentStore::Memory(_) => "memory",
    }
}
