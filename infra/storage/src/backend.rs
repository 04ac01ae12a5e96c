use crate::error::StorageError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A synchronous, string-keyed key/value backend for the local cache.
///
/// Implementations must be safe to share across threads; the cache store never holds a
/// backend lock across calls.
pub trait CacheBackend: fmt::Debug + Send + Sync {
    /// Returns the raw value stored under `key`.
    ///
    /// # Errors
    /// Backend-specific I/O or decoding failures.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Backend-specific I/O failures.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Returns whether anything was removed.
    ///
    /// # Errors
    /// Backend-specific I/O failures.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Lists every stored key, in no particular order.
    ///
    /// # Errors
    /// Backend-specific I/O failures.
    fn keys(&self) -> Result<Vec<String>, StorageError>;

    /// Byte length of the value stored under `key`, if any.
    ///
    /// # Errors
    /// Backend-specific I/O failures.
    fn value_len(&self, key: &str) -> Result<Option<u64>, StorageError> {
        Ok(self.get(key)?.map(|v| v.len() as u64))
    }

    /// Sum of key and value byte lengths across all entries.
    ///
    /// # Errors
    /// Backend-specific I/O failures.
    fn total_bytes(&self) -> Result<u64, StorageError> {
        let mut total = 0u64;
        for key in self.keys()? {
            total += key.len() as u64 + self.value_len(&key)?.unwrap_or(0);
        }
        Ok(total)
    }
}

impl<B: CacheBackend + ?Sized> CacheBackend for Arc<B> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }

    fn value_len(&self, key: &str) -> Result<Option<u64>, StorageError> {
        (**self).value_len(key)
    }

    fn total_bytes(&self) -> Result<u64, StorageError> {
        (**self).total_bytes()
    }
}

/// In-process backend: a hash map behind a read/write lock.
///
/// Used by tests, the offline console and preview sessions. Contents vanish with the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<RwLock<FxHashMap<String, String>>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Writes a raw value without going through the cache store. Test helper for
    /// simulating corrupted entries.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }
}

impl CacheBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.write().remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    fn value_len(&self, key: &str) -> Result<Option<u64>, StorageError> {
        Ok(self.entries.read().get(key).map(|v| v.len() as u64))
    }

    fn total_bytes(&self) -> Result<u64, StorageError> {
        Ok(self.entries.read().iter().map(|(k, v)| (k.len() + v.len()) as u64).sum())
    }
}
