//! # Content Resolution & Synchronization
//!
//! Decides which source is authoritative for a `(domain, language)` pair and propagates
//! admin edits to every tier.
//!
//! ## Tiers
//!
//! | Tier | Source | Written by |
//! |---|---|---|
//! | Preview | [`PreviewOverlay`], in-process drafts, language-agnostic | admin preview |
//! | Local | [`LocalCacheStore`](vitrine_storage::LocalCacheStore) | saves, remote reads |
//! | Remote | any [`RemoteContentStore`](vitrine_database::RemoteContentStore) | saves |
//! | Default | [`DefaultCatalog`], compiled in | never |
//!
//! [`ContentResolver`] returns the first tier holding a valid document and never fails.
//! [`Synchronizer`] validates, writes remote, mirrors locally and publishes a
//! [`ContentChanged`] notice, in that order, stopping at the first error.
//!
//! ## Example
//!
//! ```rust
//! use vitrine_content::*;
//! use vitrine_database::MemoryContentStore;
//! use vitrine_domain::{CacheTier, ContentDocument, KnownDomain, LanguageCode};
//! use vitrine_storage::LocalCacheStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), SaveError> {
//! let bus = ContentBus::new();
//! let local = LocalCacheStore::memory();
//! let remote = MemoryContentStore::new();
//! let (catalog, schemas) = (DefaultCatalog::builtin(), SchemaRegistry::default());
//!
//! let preview = PreviewOverlay::new(bus.clone());
//! let resolver =
//!     ContentResolver::new(preview, local.clone(), remote.clone(), catalog.clone(), schemas.clone());
//! let sync = Synchronizer::new(remote, local, bus, catalog, schemas);
//!
//! let news = KnownDomain::News.domain();
//! let doc = ContentDocument::from_json(r#"{"items":[]}"#).unwrap();
//! sync.save(&news, LanguageCode::En, &doc).await?;
//!
//! let resolved = resolver.resolve_traced(&news, LanguageCode::En).await;
//! assert_eq!(resolved.tier, CacheTier::Local);
//! assert_eq!(resolved.document, doc);
//! # Ok(())
//! # }
//! ```

mod catalog;
mod error;
mod notice;
mod preview;
mod resolver;
mod retry;
pub mod schema;
mod synchronizer;

pub use catalog::{DefaultCatalog, DefaultEntry};
pub use error::{SaveError, SaveErrorExt};
pub use notice::{ChangeOrigin, ContentBus, ContentChanged};
pub use preview::PreviewOverlay;
pub use resolver::{ContentResolver, Resolution};
pub use retry::RetryPolicy;
pub use schema::{SchemaError, SchemaRegistry};
pub use synchronizer::Synchronizer;
