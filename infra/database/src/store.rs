use crate::error::RemoteError;
use crate::memory::MemoryContentStore;
use crate::surreal::SurrealContentStore;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use vitrine_domain::ContentDocument;

/// The authoritative, network-backed document store.
///
/// Documents are addressed by `(collection, id)`; the content layer uses the domain as the
/// collection and the language code as the id. Writes are last-write-wins and a failed
/// operation is never retried here; retrying is the caller's decision.
pub trait RemoteContentStore: Debug + Send + Sync {
    /// Fetches a document. `Ok(None)` means it was never written.
    fn read(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<ContentDocument>, RemoteError>> + Send;

    /// Creates or replaces a document.
    fn write(
        &self,
        collection: &str,
        id: &str,
        doc: &ContentDocument,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

impl<S: RemoteContentStore> RemoteContentStore for Arc<S> {
    fn read(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<ContentDocument>, RemoteError>> + Send {
        (**self).read(collection, id)
    }

    fn write(
        &self,
        collection: &str,
        id: &str,
        doc: &ContentDocument,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send {
        (**self).write(collection, id, doc)
    }
}

/// Runtime choice between the real database and the in-memory fake.
#[derive(Debug, Clone)]
pub enum AnyContentStore {
    Surreal(SurrealContentStore),
    Memory(MemoryContentStore),
}

impl From<SurrealContentStore> for AnyContentStore {
    fn from(store: SurrealContentStore) -> Self {
        Self::Surreal(store)
    }
}

impl From<MemoryContentStore> for AnyContentStore {
    fn from(store: MemoryContentStore) -> Self {
        Self::Memory(store)
    }
}

impl RemoteContentStore for AnyContentStore {
    async fn read(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<ContentDocument>, RemoteError> {
        match self {
            Self::Surreal(store) => store.read(collection, id).await,
            Self::Memory(store) => store.read(collection, id).await,
        }
    }

    async fn write(
        &self,
        collection: &str,
        id: &str,
        doc: &ContentDocument,
    ) -> Result<(), RemoteError> {
        match self {
            Self::Surreal(store) => store.write(collection, id, doc).await,
            Self::Memory(store) => store.write(collection, id, doc).await,
        }
    }
}
