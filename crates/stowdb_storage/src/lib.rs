//! # StowDB Storage
//!
//! Storage backends for StowDB.
//!
//! A backend holds exactly one opaque blob: the serialized (and possibly
//! encrypted) record collection. Backends do not interpret that blob.
//!
//! ## Design Principles
//!
//! - Backends are whole-blob stores (read all, replace all, sync)
//! - A replace is a full-content overwrite, never an append
//! - Must be `Send + Sync` so a store can be shared across threads
//! - StowDB owns the codec and cipher; backends only move bytes
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use stowdb_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.replace(b"[1,2,3]").unwrap();
//! backend.replace(b"[]").unwrap();
//! assert_eq!(backend.read_all().unwrap(), b"[]");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
