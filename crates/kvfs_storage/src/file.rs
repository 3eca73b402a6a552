//! File-based storage for persistent values.

use crate::backend::{Handler, ReadableStorage, WritableStorage};
use crate::config::FileStorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::key::validate_key;
use crate::queue::SerialQueue;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// A storage that keeps one file per key under a root directory.
///
/// The key is appended to the root as a relative path, so
/// `"users/ann.json"` is stored at `<root>/users/ann.json`. Intermediate
/// directories are created on demand. There is no index or manifest: the
/// directory tree is the entire persisted state.
///
/// # Durability
///
/// Saves write to a temporary file next to the target and rename it into
/// place, so a crash never leaves a partially written file under the
/// key's name. With `sync_writes` enabled (the default) the file and its
/// directory are fsynced before `save` returns.
///
/// # Thread Safety
///
/// The blocking methods run on the caller's thread. The `_async` methods
/// run on a single worker thread owned by this storage, one operation at
/// a time in submission order. Nothing coordinates with other processes
/// or other `FileStorage` instances using the same root.
///
/// # Example
///
/// ```no_run
/// use kvfs_storage::{FileStorage, ReadableStorage, WritableStorage};
///
/// let storage = FileStorage::open("cache").unwrap();
/// storage.save(b"hello", "greeting.txt").unwrap();
/// assert_eq!(storage.fetch_value("greeting.txt").unwrap(), b"hello");
/// ```
#[derive(Debug)]
pub struct FileStorage {
    store: Arc<FileStore>,
    queue: SerialQueue,
}

/// The blocking half, shared with jobs on the worker.
#[derive(Debug)]
struct FileStore {
    root: PathBuf,
    sync_writes: bool,
}

impl FileStorage {
    /// Opens a storage rooted at `root` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be created or the worker
    /// thread cannot be spawned.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        Self::with_config(FileStorageConfig::new(root))
    }

    /// Opens a storage with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `create_root` is set and the root cannot be created
    /// - `create_root` is unset and the root does not exist
    /// - The root exists but is not a directory
    /// - The worker thread cannot be spawned
    pub fn with_config(config: FileStorageConfig) -> StorageResult<Self> {
        let root = config.root;

        if config.create_root {
            fs::create_dir_all(&root)?;
        }
        if !root.is_dir() {
            return Err(StorageError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("storage root is not a directory: {}", root.display()),
            )));
        }

        let queue = SerialQueue::new(config.queue_name)?;
        tracing::debug!(root = %root.display(), queue = queue.name(), "opened file storage");

        Ok(Self {
            store: Arc::new(FileStore {
                root,
                sync_writes: config.sync_writes,
            }),
            queue,
        })
    }

    /// Returns the storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.store.root
    }

    /// Returns the file path `key` maps to.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the key cannot be stored.
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        self.store.path_for(key)
    }

    fn submit<F>(&self, key: &str, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.queue.dispatch(job) {
            tracing::error!(key, queue = self.queue.name(), "storage worker is gone, dropped job");
        }
    }
}

impl FileStore {
    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        Ok(self.root.join(validate_key(key)?))
    }

    fn read(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(data) => {
                tracing::trace!(key, len = data.len(), "fetched value");
                Ok(data)
            }
            Err(e) => {
                tracing::trace!(key, error = %e, "value not readable");
                Err(StorageError::not_found(key))
            }
        }
    }

    fn write(&self, value: &[u8], key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        self.write_atomic(&path, value)
            .map_err(|e| StorageError::write_failed(key, e))?;
        tracing::trace!(key, len = value.len(), "saved value");
        Ok(())
    }

    /// Write-then-rename:
    /// 1. Create the parent directory
    /// 2. Write a uniquely named temp file beside the target
    /// 3. Rename it over the target
    /// 4. Fsync the directory so the rename is durable
    ///
    /// The temp name has a fixed length, so any key whose own file name
    /// fits the filesystem limit can be saved.
    fn write_atomic(&self, path: &Path, value: &[u8]) -> io::Result<()> {
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let temp_path = parent.join(format!(".kvfs.{}.tmp", Uuid::new_v4().simple()));

        let result = self.write_and_rename(&temp_path, path, parent, value);
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    fn write_and_rename(
        &self,
        temp_path: &Path,
        path: &Path,
        parent: &Path,
        value: &[u8],
    ) -> io::Result<()> {
        let mut file = File::create(temp_path)?;
        file.write_all(value)?;
        if self.sync_writes {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(temp_path, path)?;

        if self.sync_writes {
            sync_directory(parent)?;
        }
        Ok(())
    }
}

/// Fsyncs a directory so entry changes inside it are durable.
///
/// Windows has no directory fsync; NTFS journaling covers metadata.
#[cfg(unix)]
fn sync_directory(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> io::Result<()> {
    Ok(())
}

impl ReadableStorage for FileStorage {
    fn fetch_value(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.store.read(key)
    }

    fn fetch_value_async(&self, key: &str, handler: Handler<Vec<u8>>) {
        let store = Arc::clone(&self.store);
        let owned_key = key.to_owned();
        self.submit(key, move || handler(store.read(&owned_key)));
    }
}

impl WritableStorage for FileStorage {
    fn save(&self, value: &[u8], key: &str) -> StorageResult<()> {
        self.store.write(value, key)
    }

    fn save_async(&self, value: Vec<u8>, key: &str, handler: Handler<Vec<u8>>) {
        let store = Arc::clone(&self.store);
        let owned_key = key.to_owned();
        self.submit(key, move || {
            let result = store.write(&value, &owned_key).map(|()| value);
            handler(result);
        });
    }
}
