use crate::file::{Compression, FileBackend, FileBackendInner};
use crate::error::{StorageError, StorageErrorExt};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use private::Sealed;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tracing::info;

#[derive(Debug, Clone)]
struct FileBackendConfig {
    compression: Compression,
    create: bool,
}

impl Default for FileBackendConfig {
    fn default() -> Self {
        Self { compression: Compression::None, create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct FileBackendBuilder<S: Sealed = NoRoot> {
    state: S,
    config: FileBackendConfig,
}

#[allow(private_bounds)]
impl<S: Sealed> FileBackendBuilder<S> {
    #[must_use = "Sets compression for entry files"]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.config.compression = compression;
        self
    }

    #[must_use = "Sets whether the cache directory should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.config.create = enable;
        self
    }

    fn transition<N: Sealed>(self, state: N) -> FileBackendBuilder<N> {
        FileBackendBuilder { state, config: self.config }
    }
}

impl FileBackendBuilder<NoRoot> {
    #[must_use = "Creates a new file backend builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the directory holding the cache entries"]
    pub fn root(self, path: impl Into<PathBuf>) -> FileBackendBuilder<WithRoot> {
        self.transition(WithRoot(path.into()))
    }
}

impl FileBackendBuilder<WithRoot> {
    /// Consumes the configuration and opens the directory backend.
    ///
    /// Boot sequence:
    /// 1. **Bootstrapping**: creates the directory if `create(true)` was set.
    /// 2. **Canonicalization**: resolves the root to an absolute physical path.
    /// 3. **Self-Healing**: removes stale temp files left behind by interrupted writes.
    /// 4. **Indexing**: records the size of every entry for quota accounting.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Io`] if the directory does not exist and `create` is false,
    /// or cannot be created, resolved or listed.
    pub fn open(self) -> Result<FileBackend, StorageError> {
        let root = &self.state.0;

        if self.config.create {
            fs::create_dir_all(root)
                .context(format!("Failed to bootstrap cache root: {}", root.display()))?;
        }

        let canonical = fs::canonicalize(root)
            .context(format!("Failed to resolve cache root: {}", root.display()))?;

        let backend = FileBackend {
            inner: Arc::new(FileBackendInner {
                root: canonical,
                compression: self.config.compression,
                tmp_counter: AtomicU64::new(1),
                index: RwLock::new(FxHashMap::default()),
            }),
        };

        backend.purge_tmp();
        let entries = backend.rebuild_index()?;
        info!(path = %backend.root().display(), entries, compression = ?self.config.compression, "Opened file cache");

        Ok(backend)
    }
}
