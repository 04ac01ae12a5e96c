//! # Remote Content Store
//!
//! The authoritative, network-backed tier of the content cache. It stores one JSON document
//! per `(collection, id)` pair and knows nothing about languages, defaults or caching.
//!
//! ## Key Features
//! - **Engine Agnostic**: [`SurrealContentStore`] supports `mem://`, `rocksdb://`, `ws://` and
//!   `http://` via the `SurrealDB` `any` engine.
//! - **Resilient Connectivity**: bounded health-check retries during engine startup.
//! - **Test Double**: [`MemoryContentStore`] with an availability switch and call counters.
//! - **Uniform Failures**: every network or service failure surfaces as
//!   [`RemoteError::Unavailable`]; nothing is retried inside the store.
//!
//! ## Example
//!
//! ```rust
//! use vitrine_database::{RemoteContentStore, RemoteError, SurrealContentStore};
//! use vitrine_domain::ContentDocument;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), RemoteError> {
//!     let store = SurrealContentStore::builder()
//!         .url("mem://")
//!         .session("vitrine", "site")
//!         .init()
//!         .await?;
//!
//!     let doc = ContentDocument::from_json(r#"{"items":[]}"#).unwrap();
//!     store.write("news", "en", &doc).await?;
//!     assert_eq!(store.read("news", "en").await?, Some(doc));
//!     assert_eq!(store.read("news", "ja").await?, None);
//!     Ok(())
//! }
//! ```

mod error;
mod memory;
mod store;
mod surreal;

pub use error::{RemoteError, RemoteErrorExt};
pub use memory::MemoryContentStore;
pub use store::{AnyContentStore, RemoteContentStore};
pub use surreal::{SurrealContentStore, SurrealStoreBuilder};
