//! The record store engine.
//!
//! Every operation runs the same protocol under the store's single lock:
//! obtain the current collection, compute the new one, push it back.
//!
//! | mode       | obtain                        | push                               |
//! |------------|-------------------------------|------------------------------------|
//! | `InMemory` | the cache                     | replace the cache                  |
//! | `Strict`   | read + decrypt + decode file  | encode + encrypt + replace + fsync |

mod open;
mod ops;

use crate::config::{Location, Mode};
use crate::crypto::Cipher;
use crate::error::{StoreError, StoreResult};
use crate::record::{share, Locked, Record, Shared};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use stowdb_codec::{Codec, JsonCodec};
use stowdb_storage::StorageBackend;
use tracing::{debug, error};

/// A typed, ordered collection of records with optional file persistence.
///
/// `Store` is `Send + Sync`; share it across threads with an `Arc`. All
/// operations are linearizable: one lock guards the whole read-modify-write
/// cycle of every call.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use stowdb_core::Store;
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Task { title: String, done: bool }
///
/// let store: Store<Task> = Store::in_memory()?;
/// store.insert([
///     Task { title: "write docs".into(), done: false },
///     Task { title: "ship".into(), done: true },
/// ])?;
///
/// let open: Vec<Task> = store.where_(|t| !t.done)?;
/// assert_eq!(open.len(), 1);
///
/// store.map(|t| t.done = true)?;
/// assert!(store.get_collection()?.iter().all(|t| t.done));
/// # Ok::<(), stowdb_core::StoreError>(())
/// ```
pub struct Store<T: Record, C: Codec = JsonCodec> {
    mode: Mode,
    location: Location,
    codec: C,
    cipher: Option<Arc<dyn Cipher>>,
    sync_on_write: bool,
    has_backing: bool,
    state: Mutex<State<T>>,
}

/// Everything the store lock guards.
struct State<T> {
    backend: Option<Box<dyn StorageBackend>>,
    /// Authoritative collection in `InMemory` mode; always empty in `Strict`.
    cache: Vec<Shared<T>>,
    /// `InMemory` changes not yet committed.
    dirty: bool,
}

impl<T: Record, C: Codec> Store<T, C> {
    /// Returns the persistence mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the backing location.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Returns the codec.
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Returns `true` if the store has durable storage attached.
    #[must_use]
    pub fn has_backing(&self) -> bool {
        self.has_backing
    }

    /// Returns `true` if an in-memory store has changes since it was opened
    /// or last committed. Always `false` in strict mode.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    /// Returns the number of records.
    ///
    /// In strict mode this decodes the backing file.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the backing file cannot be read.
    pub fn len(&self) -> StoreResult<usize> {
        let state = self.state.lock();
        let len = match self.mode {
            Mode::InMemory => state.cache.len(),
            Mode::Strict => self.decode_backend::<serde::de::IgnoredAny>(&state)?.len(),
        };
        Ok(len)
    }

    /// Returns `true` if the store holds no records.
    ///
    /// # Errors
    ///
    /// Returns a fatal error if the backing file cannot be read.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// The current collection.
    ///
    /// `InMemory`: the cached handles themselves. `Strict`: freshly decoded
    /// from the backing file, so external changes are always seen.
    fn load(&self, state: &State<T>) -> StoreResult<Vec<Shared<T>>> {
        match self.mode {
            Mode::InMemory => Ok(state.cache.clone()),
            Mode::Strict => Ok(self
                .decode_backend::<T>(state)?
                .into_iter()
                .map(share)
                .collect()),
        }
    }

    /// A copy of the collection that shares nothing with the store.
    fn snapshot(&self, state: &State<T>) -> StoreResult<Vec<T>> {
        match self.mode {
            // Decoding already produces fresh values.
            Mode::Strict => self.decode_backend::<T>(state),
            Mode::InMemory => state
                .cache
                .iter()
                .map(|record| {
                    self.codec
                        .deep_clone::<T>(&*record.read())
                        .map_err(StoreError::from)
                })
                .collect(),
        }
    }

    /// Makes `records` the current collection.
    fn push(&self, state: &mut State<T>, records: Vec<Shared<T>>) -> StoreResult<()> {
        match self.mode {
            Mode::InMemory => {
                state.cache = records;
                state.dirty = true;
                Ok(())
            }
            Mode::Strict => {
                let view: Vec<Locked<'_, T>> = records.iter().map(Locked).collect();
                self.persist(state, &view)
            }
        }
    }

    /// Encodes `records` and replaces the backing blob. No-op without one.
    fn persist<R: Serialize>(&self, state: &mut State<T>, records: &[R]) -> StoreResult<()> {
        let Some(backend) = state.backend.as_deref_mut() else {
            return Ok(());
        };
        let blob = self.codec.encode(records)?;
        self.write_blob(backend, &blob)
    }

    fn write_blob(&self, backend: &mut dyn StorageBackend, plain: &[u8]) -> StoreResult<()> {
        let bytes: Cow<'_, [u8]> = match &self.cipher {
            Some(cipher) => Cow::Owned(cipher.encrypt(plain)?),
            None => Cow::Borrowed(plain),
        };

        backend.replace(&bytes)?;
        backend.flush()?;
        if self.sync_on_write {
            backend.sync()?;
        }
        Ok(())
    }

    fn decode_backend<R: DeserializeOwned>(&self, state: &State<T>) -> StoreResult<Vec<R>> {
        let Some(backend) = state.backend.as_deref() else {
            return Ok(Vec::new());
        };

        let raw = backend.read_all()?;
        let plain: Cow<'_, [u8]> = match &self.cipher {
            Some(cipher) => Cow::Owned(cipher.decrypt(&raw)?),
            None => Cow::Borrowed(&raw),
        };

        Ok(self.codec.decode(&plain)?)
    }

    /// Logs fatal errors on their way out.
    fn report<R>(&self, op: &'static str, result: StoreResult<R>) -> StoreResult<R> {
        if let Err(err) = &result {
            if err.is_fatal() {
                error!(
                    op,
                    location = %self.location,
                    codec = self.codec.name(),
                    error = %err,
                    "store operation failed"
                );
            }
        }
        result
    }
}

impl<T: Record, C: Codec> Drop for Store<T, C> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.dirty && self.has_backing {
            debug!(
                location = %self.location,
                records = state.cache.len(),
                "dropping store with uncommitted changes"
            );
        }
    }
}

impl<T: Record, C: Codec> fmt::Debug for Store<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("record", &std::any::type_name::<T>())
            .field("mode", &self.mode)
            .field("location", &self.location)
            .field("codec", &self.codec.name())
            .field("encrypted", &self.cipher.is_some())
            .finish_non_exhaustive()
    }
}
