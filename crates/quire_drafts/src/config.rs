//! Draft store configuration.

use crate::crypto::EncryptionKey;
use crate::error::DraftResult;

/// Configuration for a [`DraftStore`](crate::DraftStore).
#[derive(Debug, Clone)]
pub struct DraftStoreConfig {
    /// Storage namespace holding draft records.
    pub namespace: String,
    /// Salt mixed into passphrase-derived keys.
    pub key_salt: Vec<u8>,
}

impl Default for DraftStoreConfig {
    fn default() -> Self {
        Self {
            namespace: "cms_local_articles".into(),
            key_salt: b"quire-drafts".to_vec(),
        }
    }
}

impl DraftStoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the key derivation salt.
    #[must_use]
    pub fn with_key_salt(mut self, salt: impl Into<Vec<u8>>) -> Self {
        self.key_salt = salt.into();
        self
    }

    /// Derives the draft key from a passphrase and this configuration's salt.
    pub fn derive_key(&self, passphrase: &str) -> DraftResult<EncryptionKey> {
        EncryptionKey::derive_from_passphrase(passphrase.as_bytes(), &self.key_salt)
    }
}
