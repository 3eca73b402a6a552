//! CBOR codec backed by `ciborium`.

use crate::error::{CodecError, CodecResult};
use crate::Codec;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes values as CBOR (RFC 8949).
///
/// More compact than JSON and able to carry byte strings and non-string
/// map keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CborCodec;

impl CborCodec {
    /// Creates a CBOR codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Codec for CborCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::ser::into_writer(value, &mut buf)
            .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
        Ok(buf)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T> {
        ciborium::de::from_reader(bytes).map_err(|e| CodecError::decoding_failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        id: u64,
        tags: Vec<String>,
    }

    #[test]
    fn roundtrip_struct() {
        let codec = CborCodec::new();
        let record = Record {
            id: 7,
            tags: vec!["a".into(), "b".into()],
        };

        let bytes = codec.encode(&record).unwrap();
        let decoded: Record = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn small_integer_is_one_byte() {
        assert_eq!(CborCodec::new().encode(&10u8).unwrap(), vec![0x0a]);
    }

    #[test]
    fn non_string_map_keys_are_supported() {
        let codec = CborCodec::new();
        let mut map = BTreeMap::new();
        map.insert(vec![1u8, 2], 3);

        let bytes = codec.encode(&map).unwrap();
        let decoded: BTreeMap<Vec<u8>, i32> = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn truncated_input_fails_to_decode() {
        let codec = CborCodec::new();
        let bytes = codec.encode(&"hello world").unwrap();

        let result: CodecResult<String> = codec.decode(&bytes[..3]);
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }

    #[test]
    fn type_mismatch_fails_to_decode() {
        let codec = CborCodec::new();
        let bytes = codec.encode(&"text").unwrap();

        let result: CodecResult<u64> = codec.decode(&bytes);
        assert!(matches!(result, Err(CodecError::DecodingFailed { .. })));
    }
}
