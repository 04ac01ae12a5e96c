use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use vitrine_content::*;
use vitrine_database::MemoryContentStore;
use vitrine_domain::ContentDocument;
use vitrine_storage::{DEFAULT_KEY_PREFIX, DEFAULT_QUOTA_BYTES, LocalCacheStore, MemoryBackend};

/// Every tier wired together over in-memory stores, plus a log of published notices.
#[derive(Debug)]
pub struct Harness {
    pub bus: ContentBus,
    pub backend: MemoryBackend,
    pub local: LocalCacheStore,
    pub remote: MemoryContentStore,
    pub preview: PreviewOverlay,
    pub catalog: DefaultCatalog,
    pub resolver: ContentResolver<MemoryContentStore>,
    pub sync: Synchronizer<MemoryContentStore>,
    pub notices: Arc<Mutex<Vec<ContentChanged>>>,
}

impl Harness {
    #[must_use]
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }

    #[must_use]
    pub fn with_quota(quota: u64) -> Self {
        let bus = ContentBus::new();
        let backend = MemoryBackend::new();
        let local = LocalCacheStore::with_settings(backend.clone(), DEFAULT_KEY_PREFIX, quota);
        let remote = MemoryContentStore::new();
        let preview = PreviewOverlay::new(bus.clone());
        let catalog = DefaultCatalog::builtin();
        let schemas = SchemaRegistry::default();

        let resolver = ContentResolver::new(
            preview.clone(),
            local.clone(),
            remote.clone(),
            catalog.clone(),
            schemas.clone(),
        );
        let sync =
            Synchronizer::new(remote.clone(), local.clone(), bus.clone(), catalog.clone(), schemas);

        let notices = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&notices);
        bus.subscribe_all(move |notice: &ContentChanged| sink.lock().unwrap().push(notice.clone()))
            .detach();

        Self { bus, backend, local, remote, preview, catalog, resolver, sync, notices }
    }

    #[must_use]
    pub fn notices(&self) -> Vec<ContentChanged> {
        self.notices.lock().unwrap().clone()
    }
}

#[must_use]
pub fn doc(value: Value) -> ContentDocument {
    ContentDocument::new(value).unwrap()
}

/// A valid homepage document whose hero title is `title`.
#[must_use]
pub fn homepage(title: &str) -> ContentDocument {
    doc(json!({
        "hero": { "title": title, "subtitle": "Subtitle" },
        "achievements": [{ "label": "Projects", "value": 120, "suffix": "+" }],
        "subsidiaries": []
    }))
}
