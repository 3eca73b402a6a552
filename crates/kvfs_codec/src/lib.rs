//! # kvfs Codec
//!
//! The boundary between typed values and stored bytes.
//!
//! Typed storage never looks inside the bytes it saves; it hands values to
//! a [`Codec`] and stores whatever comes out. Any `serde` data format can
//! be plugged in by implementing the trait.
//!
//! ## Provided Codecs
//!
//! - [`JsonCodec`] - UTF-8 JSON via `serde_json` (the default)
//! - [`CborCodec`] - CBOR via `ciborium`
//!
//! ## Usage
//!
//! ```
//! use kvfs_codec::{Codec, JsonCodec};
//!
//! let codec = JsonCodec::new();
//! let bytes = codec.encode(&vec![1, 2, 3]).unwrap();
//! assert_eq!(bytes, b"[1,2,3]");
//!
//! let decoded: Vec<i32> = codec.decode(&bytes).unwrap();
//! assert_eq!(decoded, vec![1, 2, 3]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cbor;
mod error;
mod json;

pub use cbor::CborCodec;
pub use error::{CodecError, CodecResult};
pub use json::JsonCodec;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts between `serde` values and bytes.
///
/// Implementations must be deterministic enough that decoding the output
/// of `encode` yields a value equal to the input.
pub trait Codec: Send + Sync + 'static {
    /// Encode `value` to bytes.
    ///
    /// # Errors
    ///
    /// Returns `EncodingFailed` if the value has a shape the format
    /// cannot represent.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>>;

    /// Decode a `T` from bytes.
    ///
    /// # Errors
    ///
    /// Returns `DecodingFailed` if the bytes are malformed or do not
    /// describe a `T`.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T>;
}
