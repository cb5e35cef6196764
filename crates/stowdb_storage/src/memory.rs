//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// An in-memory storage backend.
///
/// This backend stores the blob in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Strict-mode stores that don't need persistence across processes
///
/// Clones share the same blob, so a test can keep a handle to inspect
/// what a store wrote after handing the backend over.
///
/// # Example
///
/// ```rust
/// use stowdb_storage::{StorageBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// let observer = backend.clone();
/// backend.replace(b"test data").unwrap();
/// assert_eq!(observer.data(), b"test data");
/// assert_eq!(observer.replace_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    data: Arc<RwLock<Vec<u8>>>,
    replaces: Arc<AtomicU64>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing data.
    ///
    /// Useful for testing recovery and corruption scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            replaces: Arc::default(),
        }
    }

    /// Returns a copy of the stored blob.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    /// Number of successful `replace` calls across all clones.
    #[must_use]
    pub fn replace_count(&self) -> u64 {
        self.replaces.load(Ordering::SeqCst)
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        Ok(self.data.read().clone())
    }

    fn replace(&mut self, new_data: &[u8]) -> StorageResult<()> {
        let mut data = self.data.write();
        data.clear();
        data.extend_from_slice(new_data);
        self.replaces.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        // In-memory backend has no pending writes
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        // In-memory backend has no metadata to sync
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(backend.data().is_empty());
        assert_eq!(backend.replace_count(), 0);
    }

    #[test]
    fn memory_replace_overwrites() {
        let mut backend = InMemoryBackend::new();

        backend.replace(b"hello world").unwrap();
        backend.replace(b"bye").unwrap();

        assert_eq!(backend.read_all().unwrap(), b"bye");
        assert_eq!(backend.size().unwrap(), 3);
        assert_eq!(backend.replace_count(), 2);
    }

    #[test]
    fn memory_clones_share_blob() {
        let mut backend = InMemoryBackend::new();
        let observer = backend.clone();

        backend.replace(b"shared").unwrap();
        assert_eq!(observer.data(), b"shared");
        assert_eq!(observer.replace_count(), 1);
    }

    #[test]
    fn memory_with_data() {
        let backend = InMemoryBackend::with_data(b"preloaded".to_vec());
        assert_eq!(backend.size().unwrap(), 9);
        assert_eq!(backend.read_all().unwrap(), b"preloaded");
    }

    #[test]
    fn memory_flush_and_sync_succeed() {
        let mut backend = InMemoryBackend::new();
        backend.replace(b"data").unwrap();
        assert!(backend.flush().is_ok());
        assert!(backend.sync().is_ok());
    }

    proptest! {
        #[test]
        fn last_replace_wins(blobs in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..64), 1..8)) {
            let mut backend = InMemoryBackend::new();
            for blob in &blobs {
                backend.replace(blob).unwrap();
            }
            prop_assert_eq!(&backend.read_all().unwrap(), blobs.last().unwrap());
            prop_assert_eq!(backend.replace_count(), blobs.len() as u64);
        }
    }
}
