//! JSON codec.

use crate::canonical::canonical;
use crate::error::{CodecError, CodecResult};
use crate::Codec;
use ciborium::value::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;

const NAME: &str = "json";

/// Empty-collection sentinel for JSON blobs.
pub const EMPTY_JSON: &[u8] = b"[]";

/// Stores a collection as one compact JSON array.
///
/// Record equality is decided on a canonical CBOR value, so map key order
/// does not matter and integers wider than 64 bits compare exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    type Repr = Value;

    fn name(&self) -> &'static str {
        NAME
    }

    fn empty_collection(&self) -> Vec<u8> {
        EMPTY_JSON.to_vec()
    }

    fn encode<R: Serialize>(&self, records: &[R]) -> CodecResult<Vec<u8>> {
        if records.is_empty() {
            return Ok(self.empty_collection());
        }
        serde_json::to_vec(records).map_err(|e| CodecError::encoding_failed(NAME, e.to_string()))
    }

    fn decode<R: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<Vec<R>> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::decoding_failed(NAME, e.to_string()))
    }

    fn represent<R: Serialize + ?Sized>(&self, record: &R) -> CodecResult<Self::Repr> {
        canonical(NAME, record)
    }

    fn deep_clone<R: Serialize + DeserializeOwned>(&self, record: &R) -> CodecResult<R> {
        let bytes = serde_json::to_vec(record)
            .map_err(|e| CodecError::encoding_failed(NAME, e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| CodecError::decoding_failed(NAME, e.to_string()))
    }
}
