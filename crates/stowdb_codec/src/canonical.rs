//! Format-neutral record representation used for equality.

use crate::error::{CodecError, CodecResult};
use ciborium::value::{CanonicalValue, Value};
use serde::Serialize;

/// Converts a record into a CBOR value with map entries in canonical key
/// order.
///
/// Integers of any width are kept exactly, so this accepts everything the
/// persistence path accepts. Sorting the map entries makes two records
/// equal regardless of the order their maps serialize in.
pub(crate) fn canonical<R: Serialize + ?Sized>(
    codec: &'static str,
    record: &R,
) -> CodecResult<Value> {
    let mut value =
        Value::serialized(record).map_err(|e| CodecError::encoding_failed(codec, e.to_string()))?;
    sort_maps(&mut value);
    Ok(value)
}

fn sort_maps(value: &mut Value) {
    match value {
        Value::Map(entries) => {
            for (key, item) in entries.iter_mut() {
                sort_maps(key);
                sort_maps(item);
            }
            entries.sort_by_cached_key(|(key, _)| CanonicalValue::from(key.clone()));
        }
        Value::Array(items) => items.iter_mut().for_each(sort_maps),
        Value::Tag(_, inner) => sort_maps(inner),
        _ => {}
    }
}
