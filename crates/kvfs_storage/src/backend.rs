//! Storage capability traits.

use crate::error::StorageResult;

/// Completion handler for the non-blocking storage operations.
///
/// A handler is invoked exactly once, on the storage's worker thread.
pub type Handler<T> = Box<dyn FnOnce(StorageResult<T>) + Send + 'static>;

/// Read access to a key-addressed byte store.
///
/// Storages are **opaque byte stores**. They never interpret the bytes
/// saved under a key.
///
/// # Invariants
///
/// - `fetch_value` returns exactly the bytes of the last successful save
/// - A key that was never saved fails with `NotFound`
/// - `fetch_value_async` never calls its handler on the caller's thread
///
/// # Implementors
///
/// - [`super::FileStorage`] - For persistent storage
/// - [`super::InMemoryStorage`] - For testing
pub trait ReadableStorage: Send + Sync {
    /// Reads the bytes stored under `key`, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no readable value exists for `key`, or
    /// `InvalidKey` if the key cannot name a stored value.
    fn fetch_value(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Reads the bytes stored under `key` on the storage's worker.
    ///
    /// Returns immediately. `handler` receives the same result
    /// [`ReadableStorage::fetch_value`] would have returned.
    fn fetch_value_async(&self, key: &str, handler: Handler<Vec<u8>>);
}

/// Write access to a key-addressed byte store.
pub trait WritableStorage: Send + Sync {
    /// Persists `value` under `key`, replacing any previous value.
    ///
    /// After this returns successfully, an immediate fetch of `key`
    /// returns `value`.
    ///
    /// # Errors
    ///
    /// Returns `WriteFailed` if the value cannot be persisted, or
    /// `InvalidKey` if the key cannot name a stored value.
    fn save(&self, value: &[u8], key: &str) -> StorageResult<()>;

    /// Persists `value` under `key` on the storage's worker.
    ///
    /// Returns immediately. On success `handler` receives the saved bytes.
    fn save_async(&self, value: Vec<u8>, key: &str, handler: Handler<Vec<u8>>);
}

/// Full read/write access.
///
/// Implemented for every type that is both [`ReadableStorage`] and
/// [`WritableStorage`]. Consumers that only read or only write should
/// depend on the narrower trait.
pub trait DataStorage: ReadableStorage + WritableStorage {}

impl<T: ReadableStorage + WritableStorage + ?Sized> DataStorage for T {}
