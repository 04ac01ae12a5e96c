use crate::backend::{CacheBackend, MemoryBackend};
use crate::error::{StorageError, StorageErrorExt};
use crate::file::{Compression, FileBackend};
use parking_lot::Mutex;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, warn};
use vitrine_domain::config::{CacheBackendKind, CacheConfig};
use vitrine_domain::{ContentDocument, ContentDomain, LanguageCode};

/// Key prefix used when none is configured.
pub const DEFAULT_KEY_PREFIX: &str = "vitrine:";
/// Default ceiling on the sum of key and value bytes: 5 MiB.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Bytes used by the store against its ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheUsage {
    pub used: u64,
    pub quota: u64,
}

impl CacheUsage {
    /// Bytes still available before writes start failing.
    #[must_use]
    pub const fn remaining(&self) -> u64 {
        self.quota.saturating_sub(self.used)
    }
}

pub struct LocalCacheStoreInner {
    backend: Arc<dyn CacheBackend>,
    prefix: String,
    quota: u64,
    /// Serializes quota check and write so two writers cannot both squeeze under the ceiling.
    write_lock: Mutex<()>,
}

impl fmt::Debug for LocalCacheStoreInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalCacheStore")
            .field("backend", &self.backend)
            .field("prefix", &self.prefix)
            .field("quota", &self.quota)
            .finish_non_exhaustive()
    }
}

/// Durable per-`(domain, language)` document cache with a byte quota.
///
/// Entries live under `{prefix}{domain}:{language}` as JSON and never expire; they change only
/// through [`set`](Self::set), [`remove`](Self::remove) or [`clear`](Self::clear).
/// Cloning is cheap and every clone shares the same backend.
///
/// ```rust
/// use vitrine_domain::{ContentDocument, KnownDomain, LanguageCode};
/// use vitrine_storage::LocalCacheStore;
///
/// # fn main() -> Result<(), vitrine_storage::StorageError> {
/// let cache = LocalCacheStore::memory();
/// let domain = KnownDomain::News.domain();
/// let doc = ContentDocument::from_json(r#"{"items":[]}"#).unwrap();
///
/// assert!(cache.get(&domain, LanguageCode::En)?.is_none());
/// cache.set(&domain, LanguageCode::En, &doc)?;
/// assert_eq!(cache.get(&domain, LanguageCode::En)?, Some(doc));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct LocalCacheStore {
    inner: Arc<LocalCacheStoreInner>,
}

impl Deref for LocalCacheStore {
    type Target = LocalCacheStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl LocalCacheStore {
    /// Wraps `backend` with the default prefix and quota.
    pub fn new(backend: impl CacheBackend + 'static) -> Self {
        Self::with_settings(backend, DEFAULT_KEY_PREFIX, DEFAULT_QUOTA_BYTES)
    }

    /// Wraps `backend` with an explicit key prefix and byte ceiling.
    pub fn with_settings(
        backend: impl CacheBackend + 'static,
        prefix: impl Into<String>,
        quota: u64,
    ) -> Self {
        Self {
            inner: Arc::new(LocalCacheStoreInner {
                backend: Arc::new(backend),
                prefix: prefix.into(),
                quota,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// An empty in-memory store with default settings.
    #[must_use]
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Builds the store described by the `[cache]` configuration section.
    ///
    /// # Errors
    /// Returns [`StorageError::Io`] if the file backend directory cannot be opened.
    pub fn from_config(config: &CacheConfig) -> Result<Self, StorageError> {
        let store = match config.backend {
            CacheBackendKind::Memory => {
                Self::with_settings(MemoryBackend::new(), &*config.key_prefix, config.quota_bytes)
            },
            CacheBackendKind::File => {
                let compression =
                    if config.compression { Compression::Lz4 } else { Compression::None };
                let backend =
                    FileBackend::builder().root(&config.dir).compression(compression).open()?;
                Self::with_settings(backend, &*config.key_prefix, config.quota_bytes)
            },
        };
        Ok(store)
    }

    /// Configured key prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Storage key for a `(domain, language)` pair.
    #[must_use]
    pub fn key(&self, domain: &ContentDomain, language: LanguageCode) -> String {
        format!("{}{}:{}", self.prefix, domain, language.as_str())
    }

    /// Returns the cached document, or `None` when absent.
    ///
    /// An entry that no longer decodes is removed, logged and reported as absent.
    ///
    /// # Errors
    /// Only backend I/O failures surface; decoding problems never do.
    pub fn get(
        &self,
        domain: &ContentDomain,
        language: LanguageCode,
    ) -> Result<Option<ContentDocument>, StorageError> {
        let key = self.key(domain, language);
        let raw = match self.backend.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(None),
            Err(err @ (StorageError::Decompress { .. } | StorageError::Corrupt { .. })) => {
                self.discard(&key, &err);
                return Ok(None);
            },
            Err(err) => return Err(err),
        };

        match ContentDocument::from_json(&raw) {
            Ok(doc) => Ok(Some(doc)),
            Err(err) => {
                self.discard(&key, &err);
                Ok(None)
            },
        }
    }

    fn discard(&self, key: &str, reason: &dyn fmt::Display) {
        warn!(key, error = %reason, "Discarding undecodable cache entry");
        if let Err(err) = self.backend.remove(key) {
            warn!(key, error = %err, "Failed to discard undecodable cache entry");
        }
    }

    /// Stores `doc`, replacing any previous entry for the pair.
    ///
    /// # Errors
    /// Returns [`StorageError::Quota`] if the write would push the store past its ceiling;
    /// the previous entry is left untouched in that case.
    pub fn set(
        &self,
        domain: &ContentDomain,
        language: LanguageCode,
        doc: &ContentDocument,
    ) -> Result<(), StorageError> {
        let key = self.key(domain, language);
        let value = doc.to_json();

        let _guard = self.write_lock.lock();
        self.ensure_fits(&key, value.len() as u64)?;
        self.backend.set(&key, &value).context(format!("Failed to cache {key}"))?;
        debug!(key, bytes = value.len(), "Cached document");
        Ok(())
    }

    /// Checks whether `doc` would fit under the quota without writing it.
    ///
    /// # Errors
    /// Returns [`StorageError::Quota`] if it would not.
    pub fn check_fits(
        &self,
        domain: &ContentDomain,
        language: LanguageCode,
        doc: &ContentDocument,
    ) -> Result<(), StorageError> {
        let key = self.key(domain, language);
        self.ensure_fits(&key, doc.to_json().len() as u64)
    }

    /// Removes the entry for the pair. Returns whether one existed.
    ///
    /// # Errors
    /// Backend I/O failures.
    pub fn remove(
        &self,
        domain: &ContentDomain,
        language: LanguageCode,
    ) -> Result<bool, StorageError> {
        let key = self.key(domain, language);
        let _guard = self.write_lock.lock();
        self.backend.remove(&key)
    }

    /// Drops every entry under this store's prefix. Returns the number removed.
    ///
    /// # Errors
    /// Backend I/O failures; entries removed before the failure stay removed.
    pub fn clear(&self) -> Result<usize, StorageError> {
        let _guard = self.write_lock.lock();
        let mut removed = 0;
        for key in self.backend.keys()? {
            if key.starts_with(&self.prefix) && self.backend.remove(&key)? {
                removed += 1;
            }
        }
        debug!(removed, prefix = %self.prefix, "Cleared local cache");
        Ok(removed)
    }

    /// Lists cached pairs, sorted by domain then language.
    ///
    /// Keys under the prefix that do not name a valid pair are ignored.
    ///
    /// # Errors
    /// Backend I/O failures.
    pub fn entries(&self) -> Result<Vec<(ContentDomain, LanguageCode)>, StorageError> {
        let mut pairs: Vec<_> =
            self.backend.keys()?.iter().filter_map(|key| self.parse_key(key)).collect();
        pairs.sort_by(|(da, la), (db, lb)| da.as_str().cmp(db.as_str()).then(la.cmp(lb)));
        Ok(pairs)
    }

    /// Bytes used against the quota.
    ///
    /// # Errors
    /// Backend I/O failures.
    pub fn usage(&self) -> Result<CacheUsage, StorageError> {
        Ok(CacheUsage { used: self.backend.total_bytes()?, quota: self.quota })
    }

    fn parse_key(&self, key: &str) -> Option<(ContentDomain, LanguageCode)> {
        let rest = key.strip_prefix(self.prefix.as_str())?;
        let (domain, language) = rest.rsplit_once(':')?;
        Some((ContentDomain::new(domain).ok()?, LanguageCode::parse(language).ok()?))
    }

    fn ensure_fits(&self, key: &str, value_len: u64) -> Result<(), StorageError> {
        let used = self.backend.total_bytes()?;
        let replaced = self.backend.value_len(key)?.map_or(0, |len| len + key.len() as u64);
        let projected = used - replaced.min(used) + key.len() as u64 + value_len;

        if projected > self.quota {
            return Err(StorageError::Quota {
                message: format!(
                    "writing {key} needs {} bytes; {used} of {} bytes in use",
                    key.len() as u64 + value_len,
                    self.quota
                )
                .into(),
                context: None,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_domain::KnownDomain;

    fn doc(text: &str) -> ContentDocument {
        ContentDocument::from_json(&format!(r#"{{"title":"{text}"}}"#)).unwrap()
    }

    #[test]
    fn key_layout_is_prefix_domain_language() {
        let store = LocalCacheStore::memory();
        let key = store.key(&KnownDomain::BusinessPage.domain(), LanguageCode::Zh);
        assert_eq!(key, "vitrine:business-page:zh");
        assert_eq!(
            store.parse_key(&key),
            Some((KnownDomain::BusinessPage.domain(), LanguageCode::Zh))
        );
        assert_eq!(store.parse_key("other:news:en"), None);
    }

    #[test]
    fn overwrite_only_counts_the_delta() {
        let key_len = "vitrine:news:en".len() as u64;
        let first = doc("aaaa");
        let quota = key_len + first.to_json().len() as u64;
        let store = LocalCacheStore::with_settings(MemoryBackend::new(), "vitrine:", quota);
        let news = KnownDomain::News.domain();

        store.set(&news, LanguageCode::En, &first).unwrap();
        store.set(&news, LanguageCode::En, &doc("bbbb")).unwrap();
        assert!(store.set(&news, LanguageCode::En, &doc("ccccc")).is_err());
        assert_eq!(store.usage().unwrap().remaining(), 0);
    }
}
