//! # StowDB Core
//!
//! An embeddable, typed record store.
//!
//! A [`Store`] holds an ordered collection of records of one struct type and
//! keeps it in one of two modes:
//! - [`Mode::InMemory`] - a process-local cache is authoritative; the
//!   backing file (if any) is only written by [`Store::commit`]
//! - [`Mode::Strict`] - the backing file is authoritative; every read
//!   decodes it and every write replaces it and syncs
//!
//! The whole collection is stored as one blob produced by a [`Codec`]
//! (JSON by default) and optionally transformed by a [`Cipher`].
//!
//! ## Guarantees
//!
//! - One lock per store; every operation is linearizable
//! - Insertion order is preserved by every operation except [`Store::drop`]
//! - A freshly created backing file always decodes to an empty collection
//! - A store is never handed out over a file it cannot decode
//!
//! ## Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use stowdb_core::{Mode, Store};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct User { name: String, age: u32 }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("users.stow");
//!
//! let store: Store<User> = Store::open(&path, Mode::Strict)?;
//! store.insert([User { name: "Alice".into(), age: 30 }])?;
//!
//! let adults = store.where_(|u| u.age >= 18)?;
//! assert_eq!(adults.len(), 1);
//! # Ok::<(), stowdb_core::StoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod crypto;
mod error;
mod record;
mod store;

pub use config::{Config, Location, Mode, EXTENSION};
pub use crypto::{Cipher, CipherError, CipherResult};
pub use error::{ErrorClass, StoreError, StoreResult};
pub use record::{validate_record, Record, Shared};
pub use store::Store;

pub use stowdb_codec::{CborCodec, Codec, CodecError, JsonCodec, Shape};
pub use stowdb_storage::{FileBackend, InMemoryBackend, StorageBackend, StorageError};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
