//! Local cache tier: a durable, quota-bounded key/value store for content documents.
//!
//! # Core Features
//!
//! - **Quota Enforcement**: the sum of key and value bytes never exceeds the configured
//!   ceiling; a write that would cross it fails with [`StorageError::Quota`] and changes nothing.
//! - **Pluggable Backends**: [`MemoryBackend`] for tests and offline sessions, [`FileBackend`]
//!   for persistence across restarts.
//! - **Atomic Writes**: the file backend uses a unique temp file + `fsync` + `rename`.
//! - **Transparent Compression**: optional LZ4 block compression of entry files.
//! - **Self-Healing**: stale temp files are purged and unreadable entries are dropped.
//!
//! # Architectural Overview
//!
//! 1.  **[`LocalCacheStore`]**: the thread-safe handle the resolver and synchronizer use.
//! 2.  **[`CacheBackend`]**: the synchronous string-keyed seam underneath it.
//! 3.  **[`FileBackendBuilder`]**: a type-safe fluent builder for the directory backend.
//!
//! # Examples
//!
//! ```rust
//! use vitrine_domain::{ContentDocument, KnownDomain, LanguageCode};
//! use vitrine_storage::{Compression, FileBackend, LocalCacheStore, StorageError};
//!
//! fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     let backend = FileBackend::builder()
//!         .root(tmp.path().join("cache"))
//!         .compression(Compression::Lz4)
//!         .open()?;
//!     let cache = LocalCacheStore::with_settings(backend, "site:", 1024 * 1024);
//!
//!     let homepage = KnownDomain::Homepage.domain();
//!     let doc = ContentDocument::from_json(r#"{"hero":{"title":"Hi"}}"#).unwrap();
//!     cache.set(&homepage, LanguageCode::En, &doc)?;
//!
//!     assert_eq!(cache.entries()?, vec![(homepage, LanguageCode::En)]);
//!     Ok(())
//! }
//! ```

mod backend;
mod builder;
mod error;
mod file;
mod maintenance;
mod store;

pub use backend::{CacheBackend, MemoryBackend};
pub use builder::FileBackendBuilder;
pub use error::{StorageError, StorageErrorExt};
pub use file::{Compression, FileBackend};
pub use store::{CacheUsage, DEFAULT_KEY_PREFIX, DEFAULT_QUOTA_BYTES, LocalCacheStore};
