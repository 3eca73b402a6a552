//! Error types for typed storage.

use kvfs_codec::CodecError;
use kvfs_storage::StorageError;
use thiserror::Error;

/// Result type for typed storage operations.
pub type TypedResult<T> = Result<T, TypedError>;

/// Errors that can occur in typed storage operations.
#[derive(Debug, Error)]
pub enum TypedError {
    /// The byte storage failed. `NotFound` and `WriteFailed` arrive here
    /// unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The stored bytes are not a valid encoding of the requested type.
    #[error("failed to decode value for key {key:?}: {source}")]
    Decode {
        /// The key that was fetched.
        key: String,
        /// The codec failure.
        #[source]
        source: CodecError,
    },

    /// The codec could not represent the value.
    #[error("failed to encode value for key {key:?}: {source}")]
    Encode {
        /// The key being saved.
        key: String,
        /// The codec failure.
        #[source]
        source: CodecError,
    },
}

impl TypedError {
    pub(crate) fn decode(key: impl Into<String>, source: CodecError) -> Self {
        Self::Decode {
            key: key.into(),
            source,
        }
    }

    pub(crate) fn encode(key: impl Into<String>, source: CodecError) -> Self {
        Self::Encode {
            key: key.into(),
            source,
        }
    }

    /// Returns true if no value is stored under the key.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }

    /// Returns true if the byte storage failed to write.
    #[must_use]
    pub fn is_write_failed(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_write_failed())
    }

    /// Returns true for a decode failure.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns true for an encode failure.
    #[must_use]
    pub fn is_encode(&self) -> bool {
        matches!(self, Self::Encode { .. })
    }
}
