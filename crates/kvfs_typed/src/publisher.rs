//! Lazy single-value fetches.
//!
//! A [`FetchPublisher`] wraps the handler form of
//! [`TypedStorage::async_fetch`] in a future:
//!
//! - Cold: nothing is read until the future is first polled
//! - Single value: the future resolves once with the value or the failure
//! - Unshared: every [`FetchPublisher::subscribe`] triggers its own read
//!
//! Dropping a pending future does not stop the read already queued on
//! the storage worker; the result is simply discarded.

use crate::error::TypedResult;
use crate::typed::TypedStorage;
use kvfs_codec::{Codec, JsonCodec};
use kvfs_storage::{FileStorage, ReadableStorage, StorageError};
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::{Future, IntoFuture};
use std::marker::PhantomData;
use std::pin::Pin;
use tokio::sync::oneshot;

/// A boxed future produced by [`FetchPublisher::subscribe`].
pub type Subscription<T> = Pin<Box<dyn Future<Output = TypedResult<T>> + Send + 'static>>;

/// A deferred fetch of one key, decoded as `T`.
///
/// Created by [`TypedStorage::fetch_publisher`]. Await it directly for a
/// single fetch, or call [`FetchPublisher::subscribe`] once per fetch.
///
/// The futures do not depend on any particular async runtime; the value
/// is handed over through a `tokio::sync::oneshot` channel by the storage
/// worker.
///
/// # Example
///
/// ```rust
/// use kvfs_storage::InMemoryStorage;
/// use kvfs_typed::TypedStorage;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let storage = TypedStorage::new(InMemoryStorage::new().unwrap());
/// storage.save(&42u32, "answer").unwrap();
///
/// let answer: u32 = storage.fetch_publisher("answer").await.unwrap();
/// assert_eq!(answer, 42);
/// # });
/// ```
pub struct FetchPublisher<T, S: ?Sized = FileStorage, C = JsonCodec> {
    storage: TypedStorage<S, C>,
    key: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S: ?Sized, C> FetchPublisher<T, S, C> {
    pub(crate) fn new(storage: TypedStorage<S, C>, key: &str) -> Self {
        Self {
            storage,
            key: key.to_owned(),
            _marker: PhantomData,
        }
    }

    /// Returns the key this publisher fetches.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<T, S, C> FetchPublisher<T, S, C>
where
    T: DeserializeOwned + Send + 'static,
    S: ReadableStorage + ?Sized + 'static,
    C: Codec,
{
    /// Returns a new future that performs one fetch when first polled.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T> {
        let storage = self.storage.clone();
        let key = self.key.clone();

        Box::pin(async move {
            let (tx, rx) = oneshot::channel();
            storage.async_fetch(&key, move |result| {
                // The receiver is gone if the subscriber was dropped.
                let _ = tx.send(result);
            });
            rx.await.unwrap_or(Err(StorageError::Closed.into()))
        })
    }
}

impl<T, S, C> IntoFuture for FetchPublisher<T, S, C>
where
    T: DeserializeOwned + Send + 'static,
    S: ReadableStorage + ?Sized + 'static,
    C: Codec,
{
    type Output = TypedResult<T>;
    type IntoFuture = Subscription<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.subscribe()
    }
}

impl<T, S: ?Sized, C> Clone for FetchPublisher<T, S, C> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T, S: ?Sized, C> fmt::Debug for FetchPublisher<T, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchPublisher")
            .field("key", &self.key)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
