//! # kvfs Typed
//!
//! Typed values over key-addressed byte storage.
//!
//! This crate provides:
//! - [`TypedStorage`] for saving and fetching `serde` values by key
//! - Blocking, handler and future forms of every fetch
//! - [`FetchPublisher`] for lazy, single-value fetches
//! - [`TypedError`] covering storage, decode and encode failures
//!
//! Byte storage comes from `kvfs_storage` and encoding from `kvfs_codec`;
//! the most used items of both are re-exported here.
//!
//! ## Example
//!
//! ```rust
//! use kvfs_typed::{FileStorage, TypedStorage};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let storage = TypedStorage::new(FileStorage::open(dir.path()).unwrap());
//!
//! storage.save(&vec!["a", "b"], "lists/letters.json").unwrap();
//! let letters: Vec<String> = storage.fetch("lists/letters.json").unwrap();
//! assert_eq!(letters, ["a", "b"]);
//!
//! let missing = storage.fetch::<Vec<String>>("missing");
//! assert!(missing.unwrap_err().is_not_found());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod publisher;
mod typed;

pub use error::{TypedError, TypedResult};
pub use publisher::{FetchPublisher, Subscription};
pub use typed::TypedStorage;

pub use kvfs_codec::{CborCodec, Codec, CodecError, JsonCodec};
pub use kvfs_storage::{
    DataStorage, FileStorage, FileStorageConfig, InMemoryStorage, ReadableStorage, StorageError,
    WritableStorage,
};
