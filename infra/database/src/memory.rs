use crate::error::RemoteError;
use crate::store::RemoteContentStore;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::trace;
use vitrine_domain::ContentDocument;

#[derive(Debug, Default)]
struct MemoryInner {
    documents: RwLock<FxHashMap<(String, String), ContentDocument>>,
    offline: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

/// In-process remote store with a kill switch and call counters.
///
/// Backs the console's `--offline` mode and lets tests simulate an unreachable server
/// ([`set_available(false)`](Self::set_available)) or assert that no network call happened.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    inner: Arc<MemoryInner>,
}

impl MemoryContentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles reachability. While unavailable every call fails with
    /// [`RemoteError::Unavailable`] and still counts as attempted.
    pub fn set_available(&self, available: bool) {
        self.inner.offline.store(!available, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        !self.inner.offline.load(Ordering::SeqCst)
    }

    /// Seeds a document without touching the counters.
    pub fn insert(&self, collection: &str, id: &str, doc: ContentDocument) {
        self.inner.documents.write().insert((collection.to_owned(), id.to_owned()), doc);
    }

    /// Peeks at a stored document without touching the counters.
    #[must_use]
    pub fn stored(&self, collection: &str, id: &str) -> Option<ContentDocument> {
        self.inner.documents.read().get(&(collection.to_owned(), id.to_owned())).cloned()
    }

    /// Number of `read` calls attempted so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    /// Number of `write` calls attempted so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Zeroes both counters.
    pub fn reset_counters(&self) {
        self.inner.reads.store(0, Ordering::SeqCst);
        self.inner.writes.store(0, Ordering::SeqCst);
    }

    fn ensure_available(&self, op: &'static str) -> Result<(), RemoteError> {
        if self.is_available() {
            Ok(())
        } else {
            Err(RemoteError::Unavailable {
                message: "in-memory store is switched off".into(),
                context: Some(op.into()),
            })
        }
    }
}

impl RemoteContentStore for MemoryContentStore {
    async fn read(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<ContentDocument>, RemoteError> {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        self.ensure_available("read")?;
        trace!(collection, id, "Memory store read");
        Ok(self.stored(collection, id))
    }

    async fn write(
        &self,
        collection: &str,
        id: &str,
        doc: &ContentDocument,
    ) -> Result<(), RemoteError> {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.ensure_available("write")?;
        trace!(collection, id, "Memory store write");
        self.insert(collection, id, doc.clone());
        Ok(())
    }
}
