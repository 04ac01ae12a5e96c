use crate::catalog::{DefaultCatalog, DefaultEntry};
use crate::preview::PreviewOverlay;
use crate::schema::SchemaRegistry;
use std::sync::Arc;
use tracing::{debug, instrument, trace, warn};
use vitrine_database::RemoteContentStore;
use vitrine_domain::{CacheTier, ContentDocument, ContentDomain, LanguageCode};
use vitrine_storage::LocalCacheStore;

/// Outcome of a resolve: the document plus where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub document: ContentDocument,
    pub tier: CacheTier,
    /// Language the document was written in. Differs from the requested language only when
    /// a default-language default stood in for a missing translation.
    pub served_language: LanguageCode,
}

#[derive(Debug)]
struct ResolverInner<R> {
    preview: PreviewOverlay,
    local: LocalCacheStore,
    remote: R,
    catalog: DefaultCatalog,
    schemas: SchemaRegistry,
}

/// Read path: picks the first tier holding a document for `(domain, language)`.
///
/// Tiers are consulted in priority order `Preview > Local > Remote > Default` and never
/// merged. Resolving cannot fail: unreachable or invalid tiers are logged and skipped, and the
/// default tier always answers.
#[derive(Debug)]
pub struct ContentResolver<R> {
    inner: Arc<ResolverInner<R>>,
}

impl<R> Clone for ContentResolver<R> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<R: RemoteContentStore> ContentResolver<R> {
    #[must_use]
    pub fn new(
        preview: PreviewOverlay,
        local: LocalCacheStore,
        remote: R,
        catalog: DefaultCatalog,
        schemas: SchemaRegistry,
    ) -> Self {
        Self { inner: Arc::new(ResolverInner { preview, local, remote, catalog, schemas }) }
    }

    /// The effective document for `(domain, language)`.
    pub async fn resolve(&self, domain: &ContentDomain, language: LanguageCode) -> ContentDocument {
        self.resolve_traced(domain, language).await.document
    }

    /// Like [`resolve`](Self::resolve), also reporting which tier answered.
    #[instrument(skip_all, fields(domain = %domain, language = %language))]
    pub async fn resolve_traced(&self, domain: &ContentDomain, language: LanguageCode) -> Resolution {
        let resolution = self.lookup(domain, language).await;
        debug!(
            tier = %resolution.tier,
            served_language = %resolution.served_language,
            "Content resolved"
        );
        resolution
    }

    async fn lookup(&self, domain: &ContentDomain, language: LanguageCode) -> Resolution {
        let found = |document, tier| Resolution { document, tier, served_language: language };

        if let Some(document) = self.inner.preview.get(domain) {
            return found(document, CacheTier::Preview);
        }
        if let Some(document) = self.from_local(domain, language) {
            return found(document, CacheTier::Local);
        }
        if let Some(document) = self.from_remote(domain, language).await {
            return found(document, CacheTier::Remote);
        }

        // Defaults are never written into the local cache, so a remote document published
        // later is picked up by the next resolve.
        let DefaultEntry { document, language: served_language } =
            self.inner.catalog.resolve(domain, language);
        Resolution { document, tier: CacheTier::Default, served_language }
    }

    fn from_local(&self, domain: &ContentDomain, language: LanguageCode) -> Option<ContentDocument> {
        let document = match self.inner.local.get(domain, language) {
            Ok(found) => found?,
            Err(err) => {
                warn!(error = %err, "Local cache read failed; skipping tier");
                return None;
            },
        };

        match self.inner.schemas.validate(domain, &document) {
            Ok(()) => Some(document),
            Err(err) => {
                warn!(error = %err, "Cached document does not match its shape; skipping tier");
                None
            },
        }
    }

    async fn from_remote(&self, domain: &ContentDomain, language: LanguageCode) -> Option<ContentDocument> {
        let document = match self.inner.remote.read(domain.as_str(), language.as_str()).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                trace!("No remote document");
                return None;
            },
            Err(err) => {
                warn!(error = %err, "Remote read failed; falling back to defaults");
                return None;
            },
        };

        if let Err(err) = self.inner.schemas.validate(domain, &document) {
            warn!(error = %err, "Remote document does not match its shape; skipping tier");
            return None;
        }

        if let Err(err) = self.inner.local.set(domain, language, &document) {
            warn!(error = %err, "Could not populate local cache from remote read");
        }
        Some(document)
    }
}
