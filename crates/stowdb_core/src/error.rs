//! Error types for StowDB core.

use crate::crypto::CipherError;
use std::path::{Path, PathBuf};
use stowdb_codec::Shape;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// How a caller should treat a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The store could not be constructed from the given inputs.
    /// Fix the configuration and open again.
    Construction,
    /// The backing store could not be read, decoded, encrypted or written.
    /// The store must not be trusted until the cause is fixed.
    Fatal,
    /// The call does not apply to this store (for example `commit` on a
    /// strict store). Nothing was read or written.
    Usage,
}

/// Errors that can occur in StowDB store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record type is not a struct with named fields.
    #[error("record type {type_name} must be a struct with named fields, found {shape}")]
    InvalidRecordType {
        /// Rust type name of the record.
        type_name: &'static str,
        /// Serde shape found instead.
        shape: Shape,
    },

    /// A mode value is neither `in-memory` nor `strict`.
    #[error("'{value}' is not a valid store mode")]
    InvalidMode {
        /// The rejected value.
        value: String,
    },

    /// The backing path does not carry the store extension.
    #[error("{} is not a store file (expected extension .{})", path.display(), crate::EXTENSION)]
    InvalidExtension {
        /// The rejected path.
        path: PathBuf,
    },

    /// The backing path is a directory.
    #[error("{} is a directory", path.display())]
    IsDirectory {
        /// The rejected path.
        path: PathBuf,
    },

    /// Strict mode was requested without a backing file.
    #[error("strict mode requires a backing file")]
    StrictWithoutBacking,

    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] stowdb_storage::StorageError),

    /// Codec error.
    #[error("codec error: {0}")]
    Codec(#[from] stowdb_codec::CodecError),

    /// Cipher error.
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// `commit` was called on a strict store.
    #[error("commit is only valid in in-memory mode; strict stores write on every change")]
    CommitInStrictMode,

    /// `commit` was called on a store without a backing file.
    #[error("commit requires a backing file")]
    CommitWithoutBacking,
}

impl StoreError {
    /// Creates an invalid mode error.
    pub fn invalid_mode(value: impl Into<String>) -> Self {
        Self::InvalidMode {
            value: value.into(),
        }
    }

    /// Creates an invalid extension error.
    pub fn invalid_extension(path: &Path) -> Self {
        Self::InvalidExtension {
            path: path.to_path_buf(),
        }
    }

    /// Creates an is-a-directory error.
    pub fn is_directory(path: &Path) -> Self {
        Self::IsDirectory {
            path: path.to_path_buf(),
        }
    }

    /// Classifies the error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidRecordType { .. }
            | Self::InvalidMode { .. }
            | Self::InvalidExtension { .. }
            | Self::IsDirectory { .. }
            | Self::StrictWithoutBacking => ErrorClass::Construction,
            Self::Storage(_) | Self::Codec(_) | Self::Cipher(_) => ErrorClass::Fatal,
            Self::CommitInStrictMode | Self::CommitWithoutBacking => ErrorClass::Usage,
        }
    }

    /// Returns `true` if the backing store is unreadable or unwritable.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowdb_codec::CodecError;
    use stowdb_storage::StorageError;

    #[test]
    fn classes() {
        assert_eq!(
            StoreError::invalid_mode("fast").class(),
            ErrorClass::Construction
        );
        assert_eq!(
            StoreError::StrictWithoutBacking.class(),
            ErrorClass::Construction
        );
        assert_eq!(StoreError::CommitInStrictMode.class(), ErrorClass::Usage);
        assert_eq!(StoreError::CommitWithoutBacking.class(), ErrorClass::Usage);

        let io = StorageError::Io(std::io::Error::other("disk on fire"));
        assert!(StoreError::from(io).is_fatal());
        assert!(StoreError::from(CodecError::decoding_failed("json", "eof")).is_fatal());
        assert!(!StoreError::CommitInStrictMode.is_fatal());
    }

    #[test]
    fn messages() {
        let err = StoreError::invalid_extension(Path::new("data.json"));
        assert_eq!(
            err.to_string(),
            "data.json is not a store file (expected extension .stow)"
        );
        assert_eq!(
            StoreError::invalid_mode("fast").to_string(),
            "'fast' is not a valid store mode"
        );
    }
}
