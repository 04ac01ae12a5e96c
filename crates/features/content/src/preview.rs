use crate::notice::{ChangeOrigin, ContentBus, ContentChanged};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;
use vitrine_domain::{ContentDocument, ContentDomain, LanguageCode};

#[derive(Debug, Default)]
struct PreviewInner {
    overlays: RwLock<FxHashMap<ContentDomain, ContentDocument>>,
}

/// Ephemeral, in-process drafts shown instead of published content.
///
/// An overlay is keyed by domain only and applies to every language. Overlays never leave the
/// process: the synchronizer does not read them and nothing persists them.
#[derive(Debug, Clone)]
pub struct PreviewOverlay {
    inner: Arc<PreviewInner>,
    bus: ContentBus,
}

impl PreviewOverlay {
    /// Creates an empty overlay that announces changes on `bus`.
    #[must_use]
    pub fn new(bus: ContentBus) -> Self {
        Self { inner: Arc::default(), bus }
    }

    /// Shows `doc` for `domain` in every language, replacing any previous draft.
    pub fn set(&self, domain: &ContentDomain, doc: ContentDocument) {
        self.inner.overlays.write().insert(domain.clone(), doc);
        debug!(%domain, "Preview overlay set");
        self.announce(domain, ChangeOrigin::Preview);
    }

    /// Removes the draft for `domain`. Returns whether one existed.
    pub fn clear(&self, domain: &ContentDomain) -> bool {
        let removed = self.inner.overlays.write().remove(domain).is_some();
        if removed {
            debug!(%domain, "Preview overlay cleared");
            self.announce(domain, ChangeOrigin::PreviewCleared);
        }
        removed
    }

    /// Removes every draft, announcing each cleared domain.
    pub fn clear_all(&self) -> usize {
        let drained: Vec<ContentDomain> = self.inner.overlays.write().drain().map(|(k, _)| k).collect();
        for domain in &drained {
            self.announce(domain, ChangeOrigin::PreviewCleared);
        }
        drained.len()
    }

    #[must_use]
    pub fn get(&self, domain: &ContentDomain) -> Option<ContentDocument> {
        self.inner.overlays.read().get(domain).cloned()
    }

    #[must_use]
    pub fn is_active(&self, domain: &ContentDomain) -> bool {
        self.inner.overlays.read().contains_key(domain)
    }

    fn announce(&self, domain: &ContentDomain, origin: ChangeOrigin) {
        for language in LanguageCode::ALL {
            self.bus.publish(ContentChanged::new(domain.clone(), language, origin));
        }
    }
}
