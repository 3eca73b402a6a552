//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No readable value is stored under the key.
    ///
    /// A missing file and a file that exists but cannot be read as a
    /// regular file both map to this variant.
    #[error("no value stored for key {key:?}")]
    NotFound {
        /// The key that was looked up.
        key: String,
    },

    /// Persisting the value failed.
    ///
    /// Covers directory creation, the temp file write and the final rename.
    #[error("failed to write key {key:?}: {source}")]
    WriteFailed {
        /// The key being written.
        key: String,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The key cannot be mapped to a path under the storage root.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey {
        /// The rejected key.
        key: String,
        /// Why the key was rejected.
        reason: &'static str,
    },

    /// An I/O error occurred outside of a read or write, such as while
    /// opening the storage root.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The storage worker is no longer running.
    #[error("storage is closed")]
    Closed,
}

impl StorageError {
    /// Create a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a write failed error wrapping `source`.
    pub fn write_failed(key: impl Into<String>, source: io::Error) -> Self {
        Self::WriteFailed {
            key: key.into(),
            source,
        }
    }

    /// Returns true if this is a [`StorageError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a [`StorageError::WriteFailed`].
    #[must_use]
    pub fn is_write_failed(&self) -> bool {
        matches!(self, Self::WriteFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn write_failed_keeps_source() {
        let err = StorageError::write_failed(
            "a/b",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_write_failed());
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "denied");
    }

    #[test]
    fn not_found_display() {
        let err = StorageError::not_found("missing");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no value stored for key \"missing\"");
    }
}
