//! JSON codec backed by `serde_json`.

use crate::error::{CodecError, CodecResult};
use crate::Codec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes values as UTF-8 JSON.
///
/// The default codec for typed storage. Values are written compactly
/// unless the codec was built with [`JsonCodec::pretty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Creates a codec that writes compact JSON.
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// Creates a codec that writes indented JSON.
    #[must_use]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }

    /// Returns true if output is indented.
    #[must_use]
    pub const fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let result = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        result.map_err(|e| CodecError::encoding_failed(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
    }

    #[test]
    fn encodes_struct_as_json() {
        let bytes = JsonCodec::new()
            .encode(&User {
                name: "Ann".into(),
            })
            .unwrap();
        assert_eq!(bytes, br#"{"name":"Ann"}"#);
    }

    #[test]
    fn pretty_output_is_indented() {
        let codec = JsonCodec::pretty();
        assert!(codec.is_pretty());

        let bytes = codec
            .encode(&User {
                name: "Ann".into(),
            })
            .unwrap();
        assert_eq!(bytes, b"{\n  \"name\": \"Ann\"\n}");
    }

    #[test]
    fn decodes_struct() {
        let user: User = JsonCodec::new().decode(br#"{"name":"Ann"}"#).unwrap();
        assert_eq!(user.name, "Ann");
    }

    #[test]
    fn malformed_bytes_fail_to_decode() {
        let result: CodecResult<User> = JsonCodec::new().decode(b"not json");
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }

    #[test]
    fn mismatched_shape_fails_to_decode() {
        let result: CodecResult<User> = JsonCodec::new().decode(br#"{"id":7}"#);
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }

    #[test]
    fn non_string_map_keys_fail_to_encode() {
        let mut map = HashMap::new();
        map.insert(vec![1u8, 2], 3);

        let result = JsonCodec::new().encode(&map);
        assert!(matches!(result, Err(CodecError::EncodingFailed { .. })));
    }
}
