//! Test fixtures and storage helpers.
//!
//! Provides storages rooted in temporary directories that are removed
//! when the fixture is dropped.

use kvfs_storage::{FileStorage, FileStorageConfig};
use kvfs_typed::TypedStorage;
use std::path::Path;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly `tracing` subscriber.
///
/// Filtering follows `RUST_LOG` (default `warn`). Safe to call from
/// every test; only the first call installs anything.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// A file storage in a temporary directory.
pub struct TempStorage {
    /// The storage instance.
    pub storage: FileStorage,
    /// The temporary directory (kept alive to prevent cleanup).
    dir: TempDir,
}

impl TempStorage {
    /// Creates a storage with default settings.
    pub fn new() -> Self {
        Self::with_config(|config| config)
    }

    /// Creates a storage whose config is adjusted by `configure`.
    ///
    /// The root is always the temporary directory.
    pub fn with_config(configure: impl FnOnce(FileStorageConfig) -> FileStorageConfig) -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let config = configure(FileStorageConfig::new(dir.path()));
        let storage = FileStorage::with_config(config).expect("Failed to open file storage");
        Self { storage, dir }
    }

    /// Returns the storage root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Moves the storage into a JSON typed storage, keeping the directory.
    pub fn into_typed(self) -> (TypedStorage<FileStorage>, TempDir) {
        (TypedStorage::new(self.storage), self.dir)
    }
}

impl Default for TempStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TempStorage {
    type Target = FileStorage;

    fn deref(&self) -> &Self::Target {
        &self.storage
    }
}

/// Runs a test with a temporary file storage.
///
/// # Example
///
/// ```rust
/// use kvfs_storage::{ReadableStorage, WritableStorage};
/// use kvfs_testkit::with_temp_storage;
///
/// with_temp_storage(|storage| {
///     storage.save(b"v", "k").unwrap();
///     assert_eq!(storage.fetch_value("k").unwrap(), b"v");
/// });
/// ```
pub fn with_temp_storage<F, R>(f: F) -> R
where
    F: FnOnce(&FileStorage) -> R,
{
    let fixture = TempStorage::new();
    f(&fixture)
}

/// Runs a test with a temporary JSON typed storage.
pub fn with_temp_typed<F, R>(f: F) -> R
where
    F: FnOnce(&TypedStorage<FileStorage>) -> R,
{
    let (storage, _dir) = TempStorage::new().into_typed();
    f(&storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvfs_storage::{ReadableStorage, WritableStorage};

    #[test]
    fn temp_storage_is_rooted_in_temp_dir() {
        init_test_logging();
        let fixture = TempStorage::new();
        assert_eq!(fixture.root(), fixture.path());

        fixture.save(b"x", "k").unwrap();
        assert!(fixture.path().join("k").exists());
    }

    #[test]
    fn temp_dir_is_removed_on_drop() {
        let fixture = TempStorage::new();
        let path = fixture.path().to_path_buf();
        drop(fixture);
        assert!(!path.exists());
    }

    #[test]
    fn with_config_applies_settings() {
        let fixture = TempStorage::with_config(|c| c.sync_writes(false));
        fixture.save(b"x", "k").unwrap();
        assert_eq!(fixture.fetch_value("k").unwrap(), b"x");
    }

    #[test]
    fn with_temp_typed_round_trips() {
        with_temp_typed(|storage| {
            storage.save(&"hi", "greeting.json").unwrap();
            let value: String = storage.fetch("greeting.json").unwrap();
            assert_eq!(value, "hi");
        });
    }
}
