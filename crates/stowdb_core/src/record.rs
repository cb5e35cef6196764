//! Record types.

use crate::error::{StoreError, StoreResult};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use stowdb_codec::probe_shape;

/// A type that can be kept in a [`Store`](crate::Store).
///
/// Implemented for every `Serialize + DeserializeOwned` type that can cross
/// threads. Stores additionally require records to be structs with named
/// fields; that part is checked once by [`validate_record`] when a store is
/// opened.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Record for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// A record handle shared with the store.
///
/// Returned by [`Store::uwhere`](crate::Store::uwhere). In in-memory mode the
/// handle points at the store's own copy, so writes through it are seen by
/// later reads.
///
/// Lock order is store first, record second. Release a handle's guard
/// before calling into the store that returned it.
pub type Shared<T> = Arc<RwLock<T>>;

pub(crate) fn share<T>(record: T) -> Shared<T> {
    Arc::new(RwLock::new(record))
}

/// Checks that `T` is a struct with named fields.
///
/// # Errors
///
/// Returns [`StoreError::InvalidRecordType`] for scalars, maps, sequences,
/// enums, tuple structs and anything else.
pub fn validate_record<T: Record>() -> StoreResult<()> {
    let shape = probe_shape::<T>();
    if shape.is_struct() {
        Ok(())
    } else {
        Err(StoreError::InvalidRecordType {
            type_name: std::any::type_name::<T>(),
            shape,
        })
    }
}

/// Serializes a shared record through its read lock.
pub(crate) struct Locked<'a, T>(pub(crate) &'a Shared<T>);

impl<T: Serialize> Serialize for Locked<'_, T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.read().serialize(serializer)
    }
}
