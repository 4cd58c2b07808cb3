//! Encrypted draft store.

use crate::article::LocalArticle;
use crate::config::DraftStoreConfig;
use crate::crypto::{DraftCipher, EncryptionKey};
use crate::error::{DraftError, DraftResult};
use quire_storage::{FileStore, KeyValueStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Persistent, encrypted-at-rest store for local drafts.
///
/// Each record is independent ciphertext keyed by the draft id. Records
/// that fail to open are reported as absent so that one damaged record
/// never makes the rest of the store unreadable.
pub struct DraftStore {
    backend: Arc<dyn KeyValueStore>,
    cipher: DraftCipher,
}

impl DraftStore {
    /// Creates a store over an existing backend.
    pub fn new(backend: Arc<dyn KeyValueStore>, key: EncryptionKey) -> Self {
        Self {
            backend,
            cipher: DraftCipher::new(&key),
        }
    }

    /// Opens a file-backed store in `root/<namespace>`.
    pub async fn open(
        root: &Path,
        config: &DraftStoreConfig,
        key: EncryptionKey,
    ) -> DraftResult<Self> {
        let backend = FileStore::open(root, &config.namespace).await?;
        Ok(Self::new(Arc::new(backend), key))
    }

    /// Encrypts and persists `article`, replacing any record with its id.
    ///
    /// # Errors
    ///
    /// - [`DraftError::StorageFull`] when the backend is out of space
    /// - [`DraftError::EncryptionFailure`] when no ciphertext can be produced
    pub async fn save(&self, article: &LocalArticle) -> DraftResult<()> {
        let key = article.id.to_string();
        let plaintext = serde_json::to_vec(article)
            .map_err(|e| DraftError::encryption_failed(format!("serialize draft: {e}")))?;
        let record = self.cipher.encrypt(&plaintext, key.as_bytes())?;

        self.backend.put(&key, &record).await?;
        debug!(id = %article.id, path = %article.path, synced = article.is_synced, "draft saved");
        Ok(())
    }

    /// Loads and decrypts the draft with `id`.
    ///
    /// Returns `None` if the record is missing or cannot be opened.
    pub async fn load(&self, id: Uuid) -> DraftResult<Option<LocalArticle>> {
        self.load_key(&id.to_string()).await
    }

    /// Deletes the draft with `id`. Deleting a missing draft succeeds.
    pub async fn remove(&self, id: Uuid) -> DraftResult<()> {
        self.backend.remove(&id.to_string()).await?;
        debug!(%id, "draft removed");
        Ok(())
    }

    /// Returns every readable draft, newest first.
    pub async fn list_all(&self) -> DraftResult<Vec<LocalArticle>> {
        let mut drafts = Vec::new();
        for key in self.backend.keys().await? {
            if let Some(draft) = self.load_key(&key).await? {
                drafts.push(draft);
            }
        }

        drafts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(drafts)
    }

    async fn load_key(&self, key: &str) -> DraftResult<Option<LocalArticle>> {
        let Some(record) = self.backend.get(key).await? else {
            return Ok(None);
        };

        match self.open_record(key, &record) {
            Ok(article) => Ok(Some(article)),
            Err(e) => {
                warn!(key, error = %e, "skipping unreadable draft record");
                Ok(None)
            }
        }
    }

    fn open_record(&self, key: &str, record: &[u8]) -> DraftResult<LocalArticle> {
        let plaintext = self.cipher.decrypt(record, key.as_bytes())?;
        serde_json::from_slice(&plaintext)
            .map_err(|e| DraftError::decryption_failed(format!("decode draft: {e}")))
    }
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore")
            .field("cipher", &self.cipher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_storage::InMemoryStore;

    fn store_with(backend: Arc<InMemoryStore>) -> DraftStore {
        let key = EncryptionKey::from_bytes(&[0x42u8; 32]).unwrap();
        DraftStore::new(backend, key)
    }

    #[tokio::test]
    async fn save_then_load_round_trips_every_field() {
        let store = store_with(Arc::new(InMemoryStore::new()));
        let mut draft = LocalArticle::new("Hello", "---\ntitle: Hello\n---\nBody", "src/posts/hello.md");
        draft.mark_synced();

        store.save(&draft).await.unwrap();
        assert_eq!(store.load(draft.id).await.unwrap(), Some(draft));
    }

    #[tokio::test]
    async fn remove_makes_load_absent() {
        let store = store_with(Arc::new(InMemoryStore::new()));
        let draft = LocalArticle::new("T", "c", "p");

        store.save(&draft).await.unwrap();
        store.remove(draft.id).await.unwrap();
        store.remove(draft.id).await.unwrap();
        assert_eq!(store.load(draft.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_overwrites_same_id() {
        let store = store_with(Arc::new(InMemoryStore::new()));
        let mut draft = LocalArticle::new("T", "v1", "p");
        store.save(&draft).await.unwrap();

        draft.edit("T", "v2");
        store.save(&draft).await.unwrap();

        assert_eq!(store.list_all().await.unwrap().len(), 1);
        assert_eq!(store.load(draft.id).await.unwrap().unwrap().content, "v2");
    }

    #[tokio::test]
    async fn records_are_encrypted_at_rest() {
        let backend = Arc::new(InMemoryStore::new());
        let store = store_with(Arc::clone(&backend));
        let draft = LocalArticle::new("Secret title", "plain body text", "p");
        store.save(&draft).await.unwrap();

        let raw = backend.get(&draft.id.to_string()).await.unwrap().unwrap();
        let haystack = String::from_utf8_lossy(&raw);
        assert!(!haystack.contains("plain body text"));
        assert!(!haystack.contains("Secret title"));
    }

    #[tokio::test]
    async fn corrupt_record_reads_as_absent() {
        let backend = Arc::new(InMemoryStore::new());
        let store = store_with(Arc::clone(&backend));
        let draft = LocalArticle::new("T", "c", "p");
        store.save(&draft).await.unwrap();

        backend.insert_raw(draft.id.to_string(), b"garbage that is long enough to parse".to_vec());
        assert_eq!(store.load(draft.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn record_moved_to_other_key_fails_to_open() {
        let backend = Arc::new(InMemoryStore::new());
        let store = store_with(Arc::clone(&backend));
        let draft = LocalArticle::new("T", "c", "p");
        store.save(&draft).await.unwrap();

        let raw = backend.get(&draft.id.to_string()).await.unwrap().unwrap();
        let other = Uuid::new_v4();
        backend.insert_raw(other.to_string(), raw);
        assert_eq!(store.load(other).await.unwrap(), None);
    }

    #[tokio::test]
    async fn wrong_key_reads_as_absent() {
        let backend = Arc::new(InMemoryStore::new());
        let writer = store_with(Arc::clone(&backend));
        let draft = LocalArticle::new("T", "c", "p");
        writer.save(&draft).await.unwrap();

        let reader = DraftStore::new(backend, EncryptionKey::generate());
        assert_eq!(reader.load(draft.id).await.unwrap(), None);
        assert!(reader.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_is_newest_first_and_skips_bad_records() {
        let backend = Arc::new(InMemoryStore::new());
        let store = store_with(Arc::clone(&backend));

        let mut old = LocalArticle::new("old", "1", "a");
        old.updated_at = 1_000;
        let mut mid = LocalArticle::new("mid", "2", "b");
        mid.updated_at = 2_000;
        let mut new = LocalArticle::new("new", "3", "c");
        new.updated_at = 3_000;

        for draft in [&mid, &old, &new] {
            store.save(draft).await.unwrap();
        }
        backend.insert_raw("not-a-draft", vec![0u8; 64]);

        let titles: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, ["new", "mid", "old"]);
    }

    #[tokio::test]
    async fn quota_exhaustion_is_storage_full() {
        let store = store_with(Arc::new(InMemoryStore::with_quota(64)));
        let draft = LocalArticle::new("T", "x".repeat(256), "p");

        let result = store.save(&draft).await;
        assert!(matches!(result, Err(DraftError::StorageFull { .. })));
    }

    #[tokio::test]
    async fn file_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = DraftStoreConfig::default();
        let draft = LocalArticle::new("T", "persisted", "src/posts/t.md");

        {
            let store = DraftStore::open(dir.path(), &config, config.derive_key("pw").unwrap())
                .await
                .unwrap();
            store.save(&draft).await.unwrap();
        }

        let store = DraftStore::open(dir.path(), &config, config.derive_key("pw").unwrap())
            .await
            .unwrap();
        assert_eq!(store.load(draft.id).await.unwrap(), Some(draft));
    }
}
