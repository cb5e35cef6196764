//! Store construction.

use super::{State, Store};
use crate::config::{Config, Location, Mode};
use crate::crypto::Cipher;
use crate::error::StoreResult;
use crate::record::{share, validate_record, Record};
use parking_lot::Mutex;
use stowdb_codec::Codec;
use stowdb_storage::{FileBackend, StorageBackend};
use tracing::{debug, warn};

impl<T: Record, C: Codec + Default> Store<T, C> {
    /// Opens a store at `location` with the default codec and no cipher.
    ///
    /// An empty path (or [`Location::NoWrite`]) gives a store without a
    /// backing file, which is only valid in [`Mode::InMemory`].
    ///
    /// # Errors
    ///
    /// See [`Store::open_with_codec`].
    pub fn open(location: impl Into<Location>, mode: Mode) -> StoreResult<Self> {
        Self::open_with_config(Config::new().mode(mode).location(location))
    }

    /// Opens a store whose backing blob is transformed by `cipher`.
    ///
    /// # Errors
    ///
    /// See [`Store::open_with_codec`].
    pub fn open_with_cipher(
        location: impl Into<Location>,
        mode: Mode,
        cipher: impl Cipher + 'static,
    ) -> StoreResult<Self> {
        Self::open_with_config(Config::new().mode(mode).location(location).cipher(cipher))
    }

    /// Creates an ephemeral in-memory store with no backing file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecordType`](crate::StoreError::InvalidRecordType)
    /// if `T` is not a struct with named fields.
    pub fn in_memory() -> StoreResult<Self> {
        Self::open_with_config(Config::default())
    }

    /// Opens a store from a full configuration with the default codec.
    ///
    /// # Errors
    ///
    /// See [`Store::open_with_codec`].
    pub fn open_with_config(config: Config) -> StoreResult<Self> {
        Self::open_with_codec(config, C::default())
    }
}

impl<T: Record, C: Codec> Store<T, C> {
    /// Opens a store from a configuration and an explicit codec.
    ///
    /// - A missing backing file is created and initialized with the codec's
    ///   empty collection (encrypted if a cipher is set).
    /// - An existing backing file is attached; in `InMemory` mode it is
    ///   decoded into the cache right away.
    ///
    /// # Errors
    ///
    /// Construction errors:
    /// - `InvalidRecordType` if `T` is not a struct with named fields
    /// - `InvalidExtension` / `IsDirectory` for a bad backing path
    /// - `StrictWithoutBacking` for strict mode without a path
    ///
    /// Fatal errors if the file cannot be created, read, decrypted or
    /// decoded. A store is never returned over a corrupt file.
    pub fn open_with_codec(config: Config, codec: C) -> StoreResult<Self> {
        validate_record::<T>()?;
        config.validate()?;

        let (backend, fresh): (Option<Box<dyn StorageBackend>>, bool) =
            match config.location.path() {
                None => (None, false),
                Some(path) if path.exists() => {
                    debug!(path = %path.display(), mode = %config.mode, "opening existing store file");
                    (Some(Box::new(FileBackend::open(path)?)), false)
                }
                Some(path) => {
                    debug!(path = %path.display(), mode = %config.mode, "creating store file");
                    let backend = if config.create_dirs {
                        FileBackend::create_with_dirs(path)?
                    } else {
                        FileBackend::create(path)?
                    };
                    (Some(Box::new(backend)), true)
                }
            };

        Self::assemble(config, codec, backend, fresh)
    }

    /// Opens a store over a caller-supplied backend.
    ///
    /// The location in `config` is only used for logging and is not
    /// validated. A zero-length backend is treated as new and initialized
    /// with the empty collection; anything else must hold a valid blob.
    ///
    /// # Errors
    ///
    /// `InvalidRecordType`, or a fatal error if the backend cannot be
    /// initialized or decoded.
    pub fn open_with_backend(
        backend: impl StorageBackend + 'static,
        config: Config,
        codec: C,
    ) -> StoreResult<Self> {
        validate_record::<T>()?;
        let fresh = backend.size()? == 0;
        Self::assemble(config, codec, Some(Box::new(backend)), fresh)
    }

    fn assemble(
        config: Config,
        codec: C,
        backend: Option<Box<dyn StorageBackend>>,
        fresh: bool,
    ) -> StoreResult<Self> {
        let Config {
            mode,
            location,
            cipher,
            sync_on_write,
            ..
        } = config;

        let store = Self {
            mode,
            location,
            codec,
            cipher,
            sync_on_write,
            has_backing: backend.is_some(),
            state: Mutex::new(State {
                backend,
                cache: Vec::new(),
                dirty: false,
            }),
        };

        {
            let mut state = store.state.lock();
            if fresh {
                let empty: [T; 0] = [];
                store.persist(&mut state, &empty)?;
            } else if let Some(backend) = state.backend.as_deref() {
                if backend.size()? == 0 {
                    warn!(location = %store.location, "backing file is empty; reads will fail until it holds a collection");
                }
                if mode == Mode::InMemory {
                    let records = store.decode_backend::<T>(&state)?;
                    debug!(location = %store.location, records = records.len(), "loaded cache");
                    state.cache = records.into_iter().map(share).collect();
                }
            }
        }

        debug!(
            location = %store.location,
            mode = %store.mode,
            codec = store.codec.name(),
            encrypted = store.cipher.is_some(),
            "store opened"
        );
        Ok(store)
    }
}
