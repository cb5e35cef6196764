//! AES-256-GCM cipher.

use super::{Cipher, CipherError, CipherResult};
use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// Size of the GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Encryption key for AES-256-GCM.
///
/// The key is zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl EncryptionKey {
    /// Generates a new random encryption key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CipherResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CipherError::invalid_key_size(bytes.len(), KEY_SIZE));
        }

        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Returns the key as a byte slice.
    ///
    /// # Security
    ///
    /// Don't log or serialize the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Derives a key from a password using HKDF-SHA256.
    ///
    /// HKDF is not a password hash. Use it with high-entropy input such as a
    /// generated passphrase, and store a random per-store `salt` next to the
    /// backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if HKDF expansion fails.
    pub fn derive_from_password(password: &[u8], salt: &[u8]) -> CipherResult<Self> {
        use hkdf::Hkdf;
        use sha2::Sha256;

        let hk = Hkdf::<Sha256>::new(Some(salt), password);

        let mut bytes = [0u8; KEY_SIZE];
        hk.expand(b"stowdb-blob-key-v1", &mut bytes)
            .map_err(|_| CipherError::key_derivation_failed("HKDF expand failed"))?;

        Ok(Self { bytes })
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// AES-256-GCM [`Cipher`].
///
/// Output format: `nonce (12 bytes) || ciphertext || tag (16 bytes)`, with a
/// fresh random nonce for every blob. Tampering, truncation or a wrong key
/// all surface as [`CipherError::DecryptionFailed`].
pub struct AesGcmCipher {
    cipher: Aes256Gcm,
    aad: Vec<u8>,
}

impl AesGcmCipher {
    /// Creates a cipher with the given key.
    #[must_use]
    pub fn new(key: EncryptionKey) -> Self {
        // EncryptionKey is always KEY_SIZE bytes, which is what AES-256 takes.
        let key_array = GenericArray::from_slice(key.as_bytes());
        Self {
            cipher: Aes256Gcm::new(key_array),
            aad: Vec::new(),
        }
    }

    /// Binds every blob to `aad` (authenticated, not encrypted).
    ///
    /// A blob written with one binding fails to decrypt under another, which
    /// keeps a file copied over a different store from being accepted.
    #[must_use]
    pub fn with_associated_data(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.aad = aad.into();
        self
    }
}

impl Cipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &[u8]) -> CipherResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let payload = Payload {
            msg: plaintext,
            aad: &self.aad,
        };

        let ciphertext = self
            .cipher
            .encrypt(nonce, payload)
            .map_err(|_| CipherError::encryption_failed("AES-GCM encryption error"))?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend(ciphertext);

        Ok(result)
    }

    fn decrypt(&self, ciphertext: &[u8]) -> CipherResult<Vec<u8>> {
        if ciphertext.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::decryption_failed("ciphertext too short"));
        }

        let nonce = Nonce::from_slice(&ciphertext[..NONCE_SIZE]);
        let payload = Payload {
            msg: &ciphertext[NONCE_SIZE..],
            aad: &self.aad,
        };

        self.cipher
            .decrypt(nonce, payload)
            .map_err(|_| CipherError::decryption_failed("authentication failed"))
    }
}

impl std::fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCipher")
            .field("cipher", &"Aes256Gcm")
            .field("aad_len", &self.aad.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_key() {
        let key1 = EncryptionKey::generate();
        let key2 = EncryptionKey::generate();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn key_wrong_size() {
        assert!(matches!(
            EncryptionKey::from_bytes(&[0u8; 16]),
            Err(CipherError::InvalidKeySize {
                expected: 32,
                actual: 16
            })
        ));
        assert!(EncryptionKey::from_bytes(&[0u8; 64]).is_err());
        assert!(EncryptionKey::from_bytes(&[7u8; KEY_SIZE]).is_ok());
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = AesGcmCipher::new(EncryptionKey::generate());

        let plaintext = br#"[{"name":"Alice"}]"#;
        let ciphertext = cipher.encrypt(plaintext).unwrap();
        assert_eq!(ciphertext.len(), NONCE_SIZE + plaintext.len() + TAG_SIZE);
        assert_ne!(&ciphertext[NONCE_SIZE..NONCE_SIZE + plaintext.len()], plaintext);

        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn nonce_is_fresh_per_blob() {
        let cipher = AesGcmCipher::new(EncryptionKey::generate());
        let ct1 = cipher.encrypt(b"[]").unwrap();
        let ct2 = cipher.encrypt(b"[]").unwrap();
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn wrong_key_fails() {
        let writer = AesGcmCipher::new(EncryptionKey::generate());
        let reader = AesGcmCipher::new(EncryptionKey::generate());

        let ciphertext = writer.encrypt(b"secret").unwrap();
        assert!(matches!(
            reader.decrypt(&ciphertext),
            Err(CipherError::DecryptionFailed { .. })
        ));
    }

    #[test]
    fn tampered_blob_fails() {
        let cipher = AesGcmCipher::new(EncryptionKey::generate());
        let mut ciphertext = cipher.encrypt(b"data").unwrap();
        let len = ciphertext.len();
        ciphertext[len - 1] ^= 0xFF;
        assert!(cipher.decrypt(&ciphertext).is_err());
        assert!(cipher.decrypt(&[0u8; 10]).is_err());
    }

    #[test]
    fn associated_data_binds_blob() {
        let key = EncryptionKey::from_bytes(&[42u8; KEY_SIZE]).unwrap();
        let users = AesGcmCipher::new(key.clone()).with_associated_data("users.stow");
        let orders = AesGcmCipher::new(key).with_associated_data("orders.stow");

        let ciphertext = users.encrypt(b"[]").unwrap();
        assert_eq!(users.decrypt(&ciphertext).unwrap(), b"[]");
        assert!(orders.decrypt(&ciphertext).is_err());
    }

    #[test]
    fn derive_key_from_password() {
        let key1 = EncryptionKey::derive_from_password(b"correct horse", b"salt-a").unwrap();
        let key2 = EncryptionKey::derive_from_password(b"correct horse", b"salt-a").unwrap();
        let key3 = EncryptionKey::derive_from_password(b"correct horse", b"salt-b").unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_ne!(key1.as_bytes(), key3.as_bytes());
    }

    #[test]
    fn debug_redacts() {
        let key = EncryptionKey::generate();
        assert!(format!("{key:?}").contains("REDACTED"));
    }
}
