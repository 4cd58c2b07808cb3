//! Draft encryption using AES-256-GCM.
//!
//! Record layout: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
//! The storage key of a record is bound as associated data, so a record
//! copied under another key fails to open.

use crate::error::{DraftError, DraftResult};
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

/// HKDF info string for draft keys.
const KEY_INFO: &[u8] = b"quire-draft-key-v1";

/// Key used to seal drafts.
///
/// The key is supplied by the application; the store never embeds one.
/// It is zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl EncryptionKey {
    /// Generates a new random key.
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
    /// Returns an error if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> DraftResult<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(DraftError::invalid_key_size(bytes.len(), KEY_SIZE));
        }

        let mut key_bytes = [0u8; KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Derives a key from a passphrase using HKDF-SHA256.
    ///
    /// HKDF does not slow down guessing; the passphrase should already
    /// carry high entropy.
    pub fn derive_from_passphrase(passphrase: &[u8], salt: &[u8]) -> DraftResult<Self> {
        use hkdf::Hkdf;
        use sha2::Sha256;

        let hk = Hkdf::<Sha256>::new(Some(salt), passphrase);
        let mut bytes = [0u8; KEY_SIZE];
        hk.expand(KEY_INFO, &mut bytes)
            .map_err(|_| DraftError::KeyDerivation {
                message: "HKDF expand failed".into(),
            })?;

        Ok(Self { bytes })
    }

    /// Returns the key bytes.
    ///
    /// Don't log or serialize the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Seals and opens draft records.
pub struct DraftCipher {
    cipher: Aes256Gcm,
}

impl DraftCipher {
    /// Creates a cipher for the given key.
    #[must_use]
    pub fn new(key: &EncryptionKey) -> Self {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(key.as_bytes()));
        Self { cipher }
    }

    /// Seals `plaintext`, authenticating `aad` alongside it.
    pub fn encrypt(&self, plaintext: &[u8], aad: &[u8]) -> DraftResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(
                nonce,
                Payload {
                    msg: plaintext,
                    aad,
                },
            )
            .map_err(|_| DraftError::encryption_failed("AES-GCM seal failed"))?;

        let mut record = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        record.extend_from_slice(&nonce_bytes);
        record.extend(ciphertext);
        Ok(record)
    }

    /// Opens a record produced by [`encrypt`](Self::encrypt) with the same `aad`.
    ///
    /// # Errors
    ///
    /// Fails on a wrong key, wrong associated data, truncation or tampering.
    pub fn decrypt(&self, record: &[u8], aad: &[u8]) -> DraftResult<Vec<u8>> {
        if record.len() < NONCE_SIZE + TAG_SIZE {
            return Err(DraftError::decryption_failed("record too short"));
        }

        let nonce = Nonce::from_slice(&record[..NONCE_SIZE]);
        self.cipher
            .decrypt(
                nonce,
                Payload {
                    msg: &record[NONCE_SIZE..],
                    aad,
                },
            )
            .map_err(|_| DraftError::decryption_failed("authentication failed"))
    }
}

impl std::fmt::Debug for DraftCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftCipher")
            .field("cipher", &"Aes256Gcm")
            .finish()
    }
}
