//! Persistent directory backend: one file per cache key, written atomically.

use crate::backend::CacheBackend;
use crate::builder::FileBackendBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fs;
use std::io::{ErrorKind, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Extension of every entry file.
pub(crate) const ENTRY_EXTENSION: &str = "entry";
/// Marker embedded in temporary file names; see [`maintenance`].
pub(crate) const TMP_MARKER: &str = ".vtmp.";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    #[must_use]
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, data: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(data),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(&data).context("Lz4 decompression failed")
            },
        }
    }
}

/// The internal shared state of a [`FileBackend`] instance.
#[derive(Debug)]
pub struct FileBackendInner {
    /// The canonicalized directory holding every entry file.
    pub(crate) root: PathBuf,
    /// Whether entry files are LZ4 compressed.
    pub(crate) compression: Compression,
    /// A unique counter used to generate temporary file names.
    pub(crate) tmp_counter: AtomicU64,
    /// Uncompressed value length per key, so quota checks never touch the disk.
    pub(crate) index: RwLock<FxHashMap<String, u64>>,
}

/// A thread-safe handle to a directory-backed cache.
///
/// Key names are hex-encoded into file names, so any key maps to a single flat file inside
/// the root and can never address a path outside it. Writes use the "atomic swap" pattern
/// (unique temp file, `fsync`, rename), so an entry is either the old or the new value after
/// a crash, never a torn one.
///
/// # Example
///
/// ```rust
/// use vitrine_storage::{CacheBackend, Compression, FileBackend, StorageError};
///
/// # fn main() -> Result<(), StorageError> {
/// # let tmp = tempfile::tempdir().unwrap();
/// let backend = FileBackend::builder()
///     .root(tmp.path().join("cache"))
///     .compression(Compression::Lz4)
///     .open()?;
///
/// backend.set("vitrine:news:en", r#"{"items":[]}"#)?;
/// assert_eq!(backend.get("vitrine:news:en")?.as_deref(), Some(r#"{"items":[]}"#));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    pub(crate) inner: Arc<FileBackendInner>,
}

impl Deref for FileBackend {
    type Target = FileBackendInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FileBackend {
    #[must_use = "The backend is not opened until you call .open()"]
    pub fn builder() -> FileBackendBuilder {
        FileBackendBuilder::new()
    }

    /// Directory holding the entry files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Physical path of the entry file for `key`.
    #[must_use]
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{ENTRY_EXTENSION}", hex::encode(key.as_bytes())))
    }

    /// Removes temporary files abandoned by interrupted writes.
    ///
    /// Returns `(removed, failed)` counts.
    pub fn purge_tmp(&self) -> (usize, usize) {
        maintenance::purge_tmp(&self.root)
    }

    /// Rebuilds the in-memory size index from the files on disk.
    ///
    /// Entries that no longer decode (written with another compression setting, or damaged)
    /// are deleted. Entries that cannot be read at all are indexed by their on-disk size so
    /// quota accounting and `clear` still see them.
    pub(crate) fn rebuild_index(&self) -> Result<usize, StorageError> {
        let mut index = FxHashMap::default();
        let dir = fs::read_dir(&self.root)
            .context(format!("Failed to list cache root: {}", self.root.display()))?;

        for entry in dir.flatten() {
            let path = entry.path();
            let Some(key) = key_from_path(&path) else {
                continue;
            };
            match self.read_file(&path) {
                Ok(Some(value)) => {
                    index.insert(key, value.len() as u64);
                },
                Ok(None) => {},
                Err(err @ (StorageError::Decompress { .. } | StorageError::Corrupt { .. })) => {
                    warn!(path = %path.display(), error = %err, "Deleting undecodable cache entry");
                    if let Err(err) = fs::remove_file(&path) {
                        warn!(path = %path.display(), error = %err, "Failed to delete cache entry");
                        index.insert(key, entry.metadata().map_or(0, |m| m.len()));
                    }
                },
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Indexing unreadable cache entry");
                    index.insert(key, entry.metadata().map_or(0, |m| m.len()));
                },
            }
        }

        let count = index.len();
        *self.index.write() = index;
        Ok(count)
    }

    fn read_file(&self, path: &Path) -> Result<Option<String>, StorageError> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", path.display()).into()),
                });
            },
        };

        let bytes = self.compression.decompress(raw)?;
        String::from_utf8(bytes).map(Some).map_err(|err| StorageError::Corrupt {
            message: err.to_string().into(),
            context: Some(format!("Entry is not UTF-8: {}", path.display()).into()),
        })
    }

    fn write_file(&self, target: &Path, data: &[u8]) -> Result<(), StorageError> {
        let temp = unique_tmp_path(target, &self.tmp_counter);
        let final_data = self.compression.compress(data);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&final_data).context("Write failed")?;
            file.sync_all().context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, target) {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(target)
                    .context(format!("Failed to replace existing file: {}", target.display()))?;
                fs::rename(&temp, target).context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    target.display()
                ))?;
            } else {
                let _ = fs::remove_file(&temp);
                return Err(StorageError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), target.display())
                            .into(),
                    ),
                });
            }
        }

        sync_dir(&self.root);
        Ok(())
    }
}

impl CacheBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.read_file(&self.entry_path(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        self.write_file(&path, value.as_bytes())?;
        self.index.write().insert(key.to_owned(), value.len() as u64);
        debug!(key, path = %path.display(), "Cache entry saved atomically");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.entry_path(key);
        let removed = match fs::remove_file(&path) {
            Ok(()) => true,
            Err(err) if err.kind() == ErrorKind::NotFound => false,
            Err(err) => {
                return Err(StorageError::Io {
                    source: err,
                    context: Some(format!("Failed to delete: {}", path.display()).into()),
                });
            },
        };
        self.index.write().remove(key);
        if removed {
            debug!(key, "Cache entry deleted");
        }
        Ok(removed)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.index.read().keys().cloned().collect())
    }

    fn value_len(&self, key: &str) -> Result<Option<u64>, StorageError> {
        Ok(self.index.read().get(key).copied())
    }

    fn total_bytes(&self) -> Result<u64, StorageError> {
        Ok(self.index.read().iter().map(|(k, len)| k.len() as u64 + len).sum())
    }
}

fn key_from_path(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let bytes = hex::decode(stem).ok()?;
    String::from_utf8(bytes).ok()
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("cache");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{counter}"))
}

fn sync_dir(path: &Path) {
    match fs::File::open(path) {
        Ok(dir) => {
            if let Err(err) = dir.sync_all() {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_names_are_hex_and_reversible() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::builder().root(tmp.path()).open().unwrap();

        let path = backend.entry_path("../../etc/passwd");
        assert_eq!(path.parent(), Some(backend.root()));
        assert_eq!(key_from_path(&path).as_deref(), Some("../../etc/passwd"));
    }

    #[test]
    fn foreign_files_are_not_keys() {
        assert_eq!(key_from_path(Path::new("/x/readme.txt")), None);
        assert_eq!(key_from_path(Path::new("/x/zz.entry")), None);
    }

    #[test]
    fn tmp_names_carry_the_marker() {
        let counter = AtomicU64::new(7);
        let tmp = unique_tmp_path(Path::new("/x/abcd.entry"), &counter);
        assert_eq!(tmp, Path::new("/x/abcd.entry.vtmp.7"));
    }
}
