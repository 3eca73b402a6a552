//! # kvfs Testkit
//!
//! Test utilities for kvfs.
//!
//! This crate provides:
//! - Temporary-directory storage fixtures
//! - Property-based test generators using proptest
//! - A model-checking harness for byte storages
//! - Submission-order checks for the handler-based operations
//!
//! ## Usage
//!
//! ```rust
//! use kvfs_storage::{ReadableStorage, WritableStorage};
//! use kvfs_testkit::prelude::*;
//!
//! with_temp_storage(|storage| {
//!     storage.save(b"hello", "greeting.txt").unwrap();
//!     assert_eq!(storage.fetch_value("greeting.txt").unwrap(), b"hello");
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod ordering;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::ordering::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use ordering::*;
