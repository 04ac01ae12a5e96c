use crate::catalog::DefaultCatalog;
use crate::error::{SaveError, SaveErrorExt};
use crate::notice::{ChangeOrigin, ContentBus, ContentChanged};
use crate::retry::RetryPolicy;
use crate::schema::SchemaRegistry;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use vitrine_database::RemoteContentStore;
use vitrine_domain::{ContentDocument, ContentDomain, KnownDomain, LanguageCode, TranslationBundle};
use vitrine_storage::LocalCacheStore;

#[derive(Debug)]
struct SyncInner<R> {
    remote: R,
    local: LocalCacheStore,
    bus: ContentBus,
    catalog: DefaultCatalog,
    schemas: SchemaRegistry,
}

/// Write path: validate, write remote, mirror locally, notify.
///
/// Steps run strictly in that order and stop at the first failure, so a rejected save leaves
/// both stores and every view untouched. Concurrent saves to the same pair are not
/// coordinated; the last remote write wins.
#[derive(Debug)]
pub struct Synchronizer<R> {
    inner: Arc<SyncInner<R>>,
    retry: RetryPolicy,
}

impl<R> Clone for Synchronizer<R> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner), retry: self.retry }
    }
}

impl<R: RemoteContentStore> Synchronizer<R> {
    #[must_use]
    pub fn new(
        remote: R,
        local: LocalCacheStore,
        bus: ContentBus,
        catalog: DefaultCatalog,
        schemas: SchemaRegistry,
    ) -> Self {
        Self {
            inner: Arc::new(SyncInner { remote, local, bus, catalog, schemas }),
            retry: RetryPolicy::none(),
        }
    }

    /// Sets the retry policy used by [`save`](Self::save) and [`reset`](Self::reset).
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Publishes `doc` as the content of `(domain, language)`.
    ///
    /// # Errors
    /// * [`SaveError::Invalid`] if the document does not match the domain's shape.
    /// * [`SaveError::Quota`] if it would not fit in the local cache; the remote store is not
    ///   contacted.
    /// * [`SaveError::Remote`] if the remote write fails; the local cache is unchanged.
    /// * [`SaveError::Local`] if the accepted document could not be mirrored locally.
    pub async fn save(
        &self,
        domain: &ContentDomain,
        language: LanguageCode,
        doc: &ContentDocument,
    ) -> Result<(), SaveError> {
        self.save_with(domain, language, doc, &self.retry).await
    }

    /// [`save`](Self::save) with a per-call retry policy.
    ///
    /// # Errors
    /// See [`save`](Self::save).
    pub async fn save_with(
        &self,
        domain: &ContentDomain,
        language: LanguageCode,
        doc: &ContentDocument,
        retry: &RetryPolicy,
    ) -> Result<(), SaveError> {
        self.commit(domain, language, doc, retry, ChangeOrigin::Saved).await
    }

    /// Rebuilds the nested translation tree from `bundle` and saves it.
    ///
    /// # Errors
    /// [`SaveError::Transcode`] when keys collide (`a` and `a.b`); nothing is written.
    /// Otherwise as [`save`](Self::save).
    pub async fn save_translations(
        &self,
        language: LanguageCode,
        bundle: &TranslationBundle,
    ) -> Result<(), SaveError> {
        let tree = vitrine_translation::unflatten(bundle)
            .context(format!("{} translation keys", bundle.len()))?;
        self.save(&KnownDomain::Translations.domain(), language, &tree).await
    }

    /// Overwrites `(domain, language)` with its compiled-in default and returns it.
    ///
    /// # Errors
    /// See [`save`](Self::save).
    pub async fn reset(
        &self,
        domain: &ContentDomain,
        language: LanguageCode,
    ) -> Result<ContentDocument, SaveError> {
        let default = self.inner.catalog.resolve(domain, language).document;
        self.commit(domain, language, &default, &self.retry, ChangeOrigin::Reset).await?;
        Ok(default)
    }

    /// Degraded mode for when the remote store is known to be down: validates and writes the
    /// local cache only.
    ///
    /// Other processes will not see the change, and the next successful remote read of the
    /// pair replaces it.
    ///
    /// # Errors
    /// [`SaveError::Invalid`], [`SaveError::Quota`] or [`SaveError::Local`].
    #[instrument(skip_all, fields(domain = %domain, language = %language))]
    pub fn save_local_only(
        &self,
        domain: &ContentDomain,
        language: LanguageCode,
        doc: &ContentDocument,
    ) -> Result<(), SaveError> {
        self.inner.schemas.validate(domain, doc)?;
        self.inner.local.set(domain, language, doc).map_err(SaveError::from_storage)?;
        warn!("Saved to the local cache only; the remote store was not updated");
        self.notify(domain, language, ChangeOrigin::LocalOnly);
        Ok(())
    }

    #[instrument(skip_all, fields(domain = %domain, language = %language, origin = %origin))]
    async fn commit(
        &self,
        domain: &ContentDomain,
        language: LanguageCode,
        doc: &ContentDocument,
        retry: &RetryPolicy,
        origin: ChangeOrigin,
    ) -> Result<(), SaveError> {
        self.inner.schemas.validate(domain, doc)?;
        self.inner.local.check_fits(domain, language, doc).map_err(SaveError::from_storage)?;

        let remote = &self.inner.remote;
        retry
            .run("content write", move || remote.write(domain.as_str(), language.as_str(), doc))
            .await
            .context(format!("Writing {domain}:{language}"))?;

        self.inner
            .local
            .set(domain, language, doc)
            .context("Mirroring the accepted document")?;

        let views = self.notify(domain, language, origin);
        info!(views, "Content saved");
        Ok(())
    }

    fn notify(&self, domain: &ContentDomain, language: LanguageCode, origin: ChangeOrigin) -> usize {
        self.inner.bus.publish(ContentChanged::new(domain.clone(), language, origin))
    }
}
