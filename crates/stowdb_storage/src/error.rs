//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The target path exists but is a directory.
    #[error("path is a directory: {}", path.display())]
    IsDirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// The blob is larger than this platform can address in memory.
    #[error("stored blob too large: {size} bytes")]
    TooLarge {
        /// Size reported by the backend.
        size: u64,
    },
}
