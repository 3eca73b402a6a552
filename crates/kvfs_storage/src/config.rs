//! File storage configuration.

use std::path::PathBuf;

/// Default name of the serial worker thread.
pub const DEFAULT_QUEUE_NAME: &str = "kvfs-storage-queue";

/// Configuration for opening a [`crate::FileStorage`].
#[derive(Debug, Clone)]
pub struct FileStorageConfig {
    /// Directory every key is resolved against.
    pub root: PathBuf,

    /// Name of the serial worker thread.
    pub queue_name: String,

    /// Whether to create the root directory when opening.
    pub create_root: bool,

    /// Whether to fsync the written file and its directory on every save.
    pub sync_writes: bool,
}

impl FileStorageConfig {
    /// Creates a configuration rooted at `root` with default values.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            queue_name: DEFAULT_QUEUE_NAME.to_owned(),
            create_root: true,
            sync_writes: true,
        }
    }

    /// Sets the worker thread name.
    #[must_use]
    pub fn queue_name(mut self, name: impl Into<String>) -> Self {
        self.queue_name = name.into();
        self
    }

    /// Sets whether to create the root directory when opening.
    #[must_use]
    pub const fn create_root(mut self, value: bool) -> Self {
        self.create_root = value;
        self
    }

    /// Sets whether saves are fsynced.
    #[must_use]
    pub const fn sync_writes(mut self, value: bool) -> Self {
        self.sync_writes = value;
        self
    }
}
