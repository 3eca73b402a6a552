//! Typed storage implementation.

use crate::error::{TypedError, TypedResult};
use crate::publisher::FetchPublisher;
use kvfs_codec::{Codec, JsonCodec};
use kvfs_storage::{FileStorage, ReadableStorage, WritableStorage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::type_name;
use std::sync::Arc;

/// Stores `serde` values under string keys.
///
/// `TypedStorage` composes a byte storage with a [`Codec`]: saves encode
/// then write, fetches read then decode. Values only exist in typed form
/// for the duration of a call.
///
/// Reading needs only [`ReadableStorage`] and writing only
/// [`WritableStorage`], so a read-only storage still supports the fetch
/// family.
///
/// Cloning is cheap; clones share the storage and codec.
///
/// # Example
///
/// ```rust
/// use kvfs_storage::FileStorage;
/// use kvfs_typed::TypedStorage;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct User {
///     name: String,
/// }
///
/// let dir = tempfile::tempdir().unwrap();
/// let storage = TypedStorage::new(FileStorage::open(dir.path()).unwrap());
///
/// storage.save(&User { name: "Ann".into() }, "user.json").unwrap();
/// let user: User = storage.fetch("user.json").unwrap();
/// assert_eq!(user.name, "Ann");
/// ```
#[derive(Debug)]
pub struct TypedStorage<S: ?Sized = FileStorage, C = JsonCodec> {
    storage: Arc<S>,
    codec: Arc<C>,
}

impl<S: ?Sized, C> Clone for TypedStorage<S, C> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            codec: Arc::clone(&self.codec),
        }
    }
}

impl<S> TypedStorage<S, JsonCodec> {
    /// Wraps `storage` with the default JSON codec.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_codec(storage, JsonCodec::new())
    }
}

impl<S, C> TypedStorage<S, C> {
    /// Wraps `storage` with an explicit codec.
    #[must_use]
    pub fn with_codec(storage: S, codec: C) -> Self {
        Self::from_shared(Arc::new(storage), codec)
    }
}

impl<S: ?Sized, C> TypedStorage<S, C> {
    /// Wraps a storage that is already shared, such as an
    /// `Arc<dyn DataStorage>`.
    #[must_use]
    pub fn from_shared(storage: Arc<S>, codec: C) -> Self {
        Self {
            storage,
            codec: Arc::new(codec),
        }
    }

    /// Returns the underlying byte storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the codec.
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }
}

impl<S, C> TypedStorage<S, C>
where
    S: ReadableStorage + ?Sized,
    C: Codec,
{
    /// Reads and decodes the value stored under `key`.
    ///
    /// Blocks the calling thread for the duration of the read.
    ///
    /// # Errors
    ///
    /// - `Storage(NotFound)` if nothing is stored under `key`
    /// - `Decode` if the stored bytes are not a valid `T`; the stored
    ///   bytes are left untouched
    pub fn fetch<T: DeserializeOwned>(&self, key: &str) -> TypedResult<T> {
        let bytes = self.storage.fetch_value(key)?;
        decode(&*self.codec, key, &bytes)
    }

    /// Reads and decodes the value stored under `key` on the storage's
    /// worker.
    ///
    /// Returns immediately. `completion` is invoked exactly once, on the
    /// thread the byte storage delivers its result on, with the same
    /// result [`TypedStorage::fetch`] would have returned.
    pub fn async_fetch<T, F>(&self, key: &str, completion: F)
    where
        T: DeserializeOwned + Send + 'static,
        F: FnOnce(TypedResult<T>) + Send + 'static,
    {
        let codec = Arc::clone(&self.codec);
        let owned_key = key.to_owned();
        self.storage.fetch_value_async(
            key,
            Box::new(move |result| {
                let result = result
                    .map_err(TypedError::from)
                    .and_then(|bytes| decode(&*codec, &owned_key, &bytes));
                completion(result);
            }),
        );
    }

    /// Returns a lazy, single-value fetch of `key`.
    ///
    /// Nothing is read until the returned publisher is awaited or
    /// subscribed to, and each subscription performs its own fetch.
    pub fn fetch_publisher<T>(&self, key: &str) -> FetchPublisher<T, S, C>
    where
        T: DeserializeOwned + Send + 'static,
    {
        FetchPublisher::new(self.clone(), key)
    }
}

impl<S, C> TypedStorage<S, C>
where
    S: WritableStorage + ?Sized,
    C: Codec,
{
    /// Encodes `value` and saves it under `key`, replacing any previous
    /// value.
    ///
    /// # Errors
    ///
    /// - `Encode` if the codec cannot represent the value; nothing is
    ///   written
    /// - `Storage(WriteFailed)` if the bytes cannot be persisted
    pub fn save<T: Serialize + ?Sized>(&self, value: &T, key: &str) -> TypedResult<()> {
        let bytes = encode(&*self.codec, key, value)?;
        self.storage.save(&bytes, key)?;
        Ok(())
    }

    /// Encodes `value` on the calling thread and saves it on the
    /// storage's worker.
    ///
    /// On success `completion` receives the value back, on the thread the
    /// byte storage delivers its result on.
    ///
    /// # Errors
    ///
    /// Returns `Encode` immediately if the codec cannot represent the
    /// value. Nothing is queued and `completion` is never invoked. When
    /// this returns `Ok`, `completion` is invoked exactly once.
    pub fn async_save<T, F>(&self, value: T, key: &str, completion: F) -> TypedResult<()>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(TypedResult<T>) + Send + 'static,
    {
        let bytes = encode(&*self.codec, key, &value)?;
        self.storage.save_async(
            bytes,
            key,
            Box::new(move |result| {
                completion(result.map(|_| value).map_err(TypedError::from));
            }),
        );
        Ok(())
    }
}

fn decode<C: Codec, T: DeserializeOwned>(codec: &C, key: &str, bytes: &[u8]) -> TypedResult<T> {
    let value = codec
        .decode(bytes)
        .map_err(|e| TypedError::decode(key, e))?;
    tracing::trace!(key, ty = type_name::<T>(), len = bytes.len(), "decoded value");
    Ok(value)
}

fn encode<C: Codec, T: Serialize + ?Sized>(codec: &C, key: &str, value: &T) -> TypedResult<Vec<u8>> {
    let bytes = codec
        .encode(value)
        .map_err(|e| TypedError::encode(key, e))?;
    tracing::trace!(key, ty = type_name::<T>(), len = bytes.len(), "encoded value");
    Ok(bytes)
}
