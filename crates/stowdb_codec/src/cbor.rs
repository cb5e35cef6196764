//! CBOR codec.

use crate::canonical::canonical;
use crate::error::{CodecError, CodecResult};
use crate::Codec;
use ciborium::value::Value;
use serde::de::DeserializeOwned;
use serde::Serialize;

const NAME: &str = "cbor";

/// Empty-collection sentinel for CBOR blobs (a zero-length array).
pub const EMPTY_CBOR: &[u8] = &[0x80];

/// Stores a collection as one CBOR array.
///
/// More compact than JSON and keeps byte strings as bytes. Record equality
/// is decided on a [`ciborium::value::Value`] with map keys in canonical
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborCodec;

impl Codec for CborCodec {
    type Repr = Value;

    fn name(&self) -> &'static str {
        NAME
    }

    fn empty_collection(&self) -> Vec<u8> {
        EMPTY_CBOR.to_vec()
    }

    fn encode<R: Serialize>(&self, records: &[R]) -> CodecResult<Vec<u8>> {
        if records.is_empty() {
            return Ok(self.empty_collection());
        }
        let mut buffer = Vec::new();
        ciborium::ser::into_writer(records, &mut buffer)
            .map_err(|e| CodecError::encoding_failed(NAME, e.to_string()))?;
        Ok(buffer)
    }

    fn decode<R: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<Vec<R>> {
        let records: Vec<R> = ciborium::de::from_reader(bytes)
            .map_err(|e| CodecError::decoding_failed(NAME, e.to_string()))?;
        Ok(records)
    }

    fn represent<R: Serialize + ?Sized>(&self, record: &R) -> CodecResult<Self::Repr> {
        canonical(NAME, record)
    }

    fn deep_clone<R: Serialize + DeserializeOwned>(&self, record: &R) -> CodecResult<R> {
        let mut buffer = Vec::new();
        ciborium::ser::into_writer(record, &mut buffer)
            .map_err(|e| CodecError::encoding_failed(NAME, e.to_string()))?;
        ciborium::de::from_reader(buffer.as_slice())
            .map_err(|e| CodecError::decoding_failed(NAME, e.to_string()))
    }
}
