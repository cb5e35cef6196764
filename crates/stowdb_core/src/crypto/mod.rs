//! Encryption at rest for StowDB.
//!
//! A store applies its [`Cipher`] to the whole serialized blob: `encrypt`
//! after encoding on the write path, `decrypt` before decoding on the read
//! path. The store never looks at the plaintext otherwise.
//!
//! An AES-256-GCM implementation, [`AesGcmCipher`], is available with the
//! `encryption` feature (on by default).
//!
//! ## Usage
//!
//! ```ignore
//! use stowdb_core::crypto::{AesGcmCipher, EncryptionKey};
//! use stowdb_core::{Mode, Store};
//!
//! let cipher = AesGcmCipher::new(EncryptionKey::generate());
//! let store: Store<User> = Store::open_with_cipher("users.stow", Mode::Strict, cipher)?;
//! ```

#[cfg(feature = "encryption")]
mod aes;

#[cfg(feature = "encryption")]
pub use aes::*;

use thiserror::Error;

/// Result type for cipher operations.
pub type CipherResult<T> = Result<T, CipherError>;

/// Errors raised by a [`Cipher`].
#[derive(Debug, Error)]
pub enum CipherError {
    /// Encryption failed.
    #[error("encryption failed: {message}")]
    EncryptionFailed {
        /// Description of the failure.
        message: String,
    },

    /// Decryption failed (wrong key, tampered or truncated data).
    #[error("decryption failed: {message}")]
    DecryptionFailed {
        /// Description of the failure.
        message: String,
    },

    /// Invalid key size.
    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Expected size in bytes.
        expected: usize,
        /// Actual size in bytes.
        actual: usize,
    },

    /// Key derivation failed.
    #[error("key derivation failed: {message}")]
    KeyDerivationFailed {
        /// Description of the failure.
        message: String,
    },
}

impl CipherError {
    /// Creates an encryption failed error.
    pub fn encryption_failed(message: impl Into<String>) -> Self {
        Self::EncryptionFailed {
            message: message.into(),
        }
    }

    /// Creates a decryption failed error.
    pub fn decryption_failed(message: impl Into<String>) -> Self {
        Self::DecryptionFailed {
            message: message.into(),
        }
    }

    /// Creates an invalid key size error.
    pub fn invalid_key_size(actual: usize, expected: usize) -> Self {
        Self::InvalidKeySize { expected, actual }
    }

    /// Creates a key derivation failed error.
    pub fn key_derivation_failed(message: impl Into<String>) -> Self {
        Self::KeyDerivationFailed {
            message: message.into(),
        }
    }
}

/// A symmetric byte transform applied to the stored blob.
///
/// `decrypt(encrypt(x))` must equal `x`. Implementations must be safe to
/// call from any thread.
pub trait Cipher: Send + Sync {
    /// Transforms plaintext into its at-rest form.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be encrypted.
    fn encrypt(&self, plaintext: &[u8]) -> CipherResult<Vec<u8>>;

    /// Reverses [`Cipher::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be decrypted.
    fn decrypt(&self, ciphertext: &[u8]) -> CipherResult<Vec<u8>>;
}
