//! # StowDB Codec
//!
//! Converts an ordered collection of records to and from one byte blob.
//!
//! The store treats a codec as a replaceable collaborator. Only three
//! properties matter to it:
//! - `decode(encode(records))` yields records equal to the input
//! - an empty collection encodes to the codec's empty-collection sentinel
//! - [`Codec::represent`] gives a value whose equality matches "these two
//!   records would persist identically", and accepts every record that
//!   `encode` accepts
//!
//! ## Codecs
//!
//! - [`JsonCodec`] - JSON arrays via `serde_json` (the default)
//! - [`CborCodec`] - CBOR arrays via `ciborium`
//!
//! ## Usage
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use stowdb_codec::{Codec, JsonCodec};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Point { x: i32, y: i32 }
//!
//! let codec = JsonCodec;
//! let bytes = codec.encode(&[Point { x: 1, y: 2 }]).unwrap();
//! assert_eq!(bytes, br#"[{"x":1,"y":2}]"#);
//!
//! let decoded: Vec<Point> = codec.decode(&bytes).unwrap();
//! assert_eq!(decoded, vec![Point { x: 1, y: 2 }]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod canonical;
mod cbor;
mod error;
mod json;
mod shape;

pub use cbor::CborCodec;
pub use error::{CodecError, CodecResult};
pub use json::JsonCodec;
pub use shape::{probe_shape, Shape};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A serialization format for whole record collections.
///
/// Implementations must be stateless or internally synchronized: a store
/// calls them from whichever thread holds its lock.
pub trait Codec: Send + Sync + 'static {
    /// Codec-level representation of one record.
    ///
    /// Two records are considered equal by the store when their
    /// representations are equal. Fields the codec skips do not take part.
    type Repr: PartialEq + Send;

    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// The blob stored for a collection with zero records.
    fn empty_collection(&self) -> Vec<u8>;

    /// Encodes records as one blob.
    ///
    /// An empty slice must encode to [`Codec::empty_collection`].
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be represented by the format.
    fn encode<R: Serialize>(&self, records: &[R]) -> CodecResult<Vec<u8>>;

    /// Decodes a blob produced by [`Codec::encode`].
    ///
    /// # Errors
    ///
    /// Returns an error if the blob is not a valid collection of `R`.
    fn decode<R: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<Vec<R>>;

    /// Returns the codec-level representation of a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be represented by the format.
    fn represent<R: Serialize + ?Sized>(&self, record: &R) -> CodecResult<Self::Repr>;

    /// Clones a record by passing it through the codec.
    ///
    /// Goes through the same bytes as [`Codec::encode`] and
    /// [`Codec::decode`], so the clone carries exactly the state that would
    /// survive a save/reload cycle and shares nothing with the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not round-trip.
    fn deep_clone<R: Serialize + DeserializeOwned>(&self, record: &R) -> CodecResult<R>;
}
