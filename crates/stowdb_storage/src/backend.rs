//! Storage backend trait definition.

use crate::error::StorageResult;

/// A whole-blob storage backend for StowDB.
///
/// A backend holds one opaque byte blob. StowDB reads it whole, decodes it,
/// and writes it back whole. Backends never see individual records.
///
/// # Invariants
///
/// - `read_all` returns exactly the bytes passed to the last `replace`
/// - `replace` overwrites the entire content; no trailing bytes of an older,
///   longer blob may survive
/// - `sync` ensures the last replaced content is durable
/// - Backends must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads the entire stored blob.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn read_all(&self) -> StorageResult<Vec<u8>>;

    /// Replaces the entire stored blob with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs. The content is unspecified
    /// after a failed replace.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Flushes pending writes to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Syncs data and metadata to durable storage.
    ///
    /// After this returns successfully, the last replaced blob is
    /// guaranteed to survive process termination.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Returns the current size of the stored blob in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;
}
