//! # kvfs Storage
//!
//! Key-addressed byte storage.
//!
//! This crate provides the lowest-level storage abstraction for kvfs.
//! Storages are **opaque byte stores** - they do not interpret the bytes
//! saved under a key.
//!
//! ## Design Principles
//!
//! - Two narrow capabilities, [`ReadableStorage`] and [`WritableStorage`],
//!   composed as [`DataStorage`]
//! - Every operation comes in a blocking form and a handler form; the
//!   handler form runs the blocking form on a [`SerialQueue`]
//! - Keys are relative paths; separators act as namespaces
//! - Failures are returned, never retried
//!
//! ## Available Storages
//!
//! - [`FileStorage`] - One file per key under a root directory
//! - [`InMemoryStorage`] - For testing and ephemeral storage
//!
//! ## Example
//!
//! ```rust
//! use kvfs_storage::{FileStorage, ReadableStorage, WritableStorage};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let storage = FileStorage::open(dir.path()).unwrap();
//! storage.save(b"hello", "greeting.txt").unwrap();
//! assert_eq!(storage.fetch_value("greeting.txt").unwrap(), b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod config;
mod error;
mod file;
mod key;
mod memory;
mod queue;

pub use backend::{DataStorage, Handler, ReadableStorage, WritableStorage};
pub use config::{FileStorageConfig, DEFAULT_QUEUE_NAME};
pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
pub use key::{normalize_key, validate_key};
pub use memory::InMemoryStorage;
pub use queue::SerialQueue;
