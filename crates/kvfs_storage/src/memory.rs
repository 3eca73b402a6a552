//! In-memory storage for testing.

use crate::backend::{Handler, ReadableStorage, WritableStorage};
use crate::config::DEFAULT_QUEUE_NAME;
use crate::error::{StorageError, StorageResult};
use crate::key::normalize_key;
use crate::queue::SerialQueue;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type Entries = Arc<RwLock<HashMap<String, Vec<u8>>>>;

/// An in-memory storage.
///
/// Keeps all values in a map and is suitable for:
/// - Unit tests
/// - Integration tests of code written against the storage traits
/// - Ephemeral stores that don't need persistence
///
/// Keys follow the same rules as [`super::FileStorage`], including
/// aliasing: `"./a"` and `"a"` address one entry. The `_async` methods use
/// the same kind of serial worker.
///
/// # Example
///
/// ```rust
/// use kvfs_storage::{InMemoryStorage, ReadableStorage, WritableStorage};
///
/// let storage = InMemoryStorage::new().unwrap();
/// storage.save(b"test data", "k").unwrap();
/// assert_eq!(storage.fetch_value("k").unwrap(), b"test data");
/// ```
#[derive(Debug)]
pub struct InMemoryStorage {
    entries: Entries,
    queue: SerialQueue,
}

impl InMemoryStorage {
    /// Creates a new empty storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be spawned.
    pub fn new() -> StorageResult<Self> {
        Self::with_entries(HashMap::new())
    }

    /// Creates a storage with pre-existing entries.
    ///
    /// Useful for testing decode failures on hand-written bytes. Keys are
    /// stored in their normalized spelling.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if any key is invalid, or an error if the
    /// worker thread cannot be spawned.
    pub fn with_entries(entries: HashMap<String, Vec<u8>>) -> StorageResult<Self> {
        let entries = entries
            .into_iter()
            .map(|(key, value)| normalize_key(&key).map(|key| (key, value)))
            .collect::<StorageResult<HashMap<_, _>>>()?;
        Ok(Self {
            entries: Arc::new(RwLock::new(entries)),
            queue: SerialQueue::new(format!("{DEFAULT_QUEUE_NAME}-memory"))?,
        })
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns a sorted list of stored keys.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
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

fn read(entries: &Entries, key: &str) -> StorageResult<Vec<u8>> {
    let normalized = normalize_key(key)?;
    entries
        .read()
        .get(&normalized)
        .cloned()
        .ok_or_else(|| StorageError::not_found(key))
}

fn write(entries: &Entries, value: &[u8], key: &str) -> StorageResult<()> {
    entries.write().insert(normalize_key(key)?, value.to_vec());
    Ok(())
}

impl ReadableStorage for InMemoryStorage {
    fn fetch_value(&self, key: &str) -> StorageResult<Vec<u8>> {
        read(&self.entries, key)
    }

    fn fetch_value_async(&self, key: &str, handler: Handler<Vec<u8>>) {
        let entries = Arc::clone(&self.entries);
        let owned_key = key.to_owned();
        self.submit(key, move || handler(read(&entries, &owned_key)));
    }
}

impl WritableStorage for InMemoryStorage {
    fn save(&self, value: &[u8], key: &str) -> StorageResult<()> {
        write(&self.entries, value, key)
    }

    fn save_async(&self, value: Vec<u8>, key: &str, handler: Handler<Vec<u8>>) {
        let entries = Arc::clone(&self.entries);
        let owned_key = key.to_owned();
        self.submit(key, move || {
            let result = write(&entries, &value, &owned_key).map(|()| value);
            handler(result);
        });
    }
}
