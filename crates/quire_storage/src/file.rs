//! File-based key-value store for persistent storage.

use crate::backend::KeyValueStore;
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Extension given to value files named by the hex encoding of their key.
const VALUE_EXT: &str = "val";
/// Extension given to value files named by the hash of a long key.
const HASHED_EXT: &str = "hval";
/// Extension given to in-flight writes before they are renamed into place.
const TEMP_EXT: &str = "tmp";

/// Longest key, in bytes, that is stored under its hex-encoded name.
///
/// Longer keys would push the file name past common 255-byte limits.
pub const MAX_INLINE_KEY_LEN: usize = 100;

/// Size of the key-length prefix in hashed value files.
const KEY_LEN_PREFIX: usize = 4;

/// Where a key lives on disk.
enum Slot {
    /// Named `<hex(key)>.val`; the file holds the raw value.
    Inline(String),
    /// Named `<sha256(key)>.hval`; the file holds the key then the value.
    Hashed(String),
}

impl Slot {
    fn for_key(key: &str) -> Self {
        if key.len() <= MAX_INLINE_KEY_LEN {
            Slot::Inline(hex::encode(key.as_bytes()))
        } else {
            Slot::Hashed(hex::encode(Sha256::digest(key.as_bytes())))
        }
    }

    fn stem(&self) -> &str {
        match self {
            Slot::Inline(stem) | Slot::Hashed(stem) => stem,
        }
    }

    fn file_name(&self) -> String {
        match self {
            Slot::Inline(stem) => format!("{stem}.{VALUE_EXT}"),
            Slot::Hashed(stem) => format!("{stem}.{HASHED_EXT}"),
        }
    }
}

/// Prefixes `value` with the length and bytes of `key`.
fn encode_hashed(key: &str, value: &[u8]) -> StorageResult<Vec<u8>> {
    let len = u32::try_from(key.len()).map_err(|_| StorageError::InvalidKey(key.to_string()))?;
    let mut out = Vec::with_capacity(KEY_LEN_PREFIX + key.len() + value.len());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(key.as_bytes());
    out.extend_from_slice(value);
    Ok(out)
}

/// Splits a hashed value file into its key and value.
fn decode_hashed(data: &[u8]) -> Option<(&str, &[u8])> {
    let prefix: [u8; KEY_LEN_PREFIX] = data.get(..KEY_LEN_PREFIX)?.try_into().ok()?;
    let len = u32::from_le_bytes(prefix) as usize;
    let rest = &data[KEY_LEN_PREFIX..];
    let key = std::str::from_utf8(rest.get(..len)?).ok()?;
    Some((key, &rest[len..]))
}

/// A file-based key-value store.
///
/// Each namespace is a directory; each key is one file inside it. Keys of up
/// to [`MAX_INLINE_KEY_LEN`] bytes are named by the hex encoding of the key,
/// so keys containing slashes or other path characters map to flat,
/// unambiguous filenames. Longer keys are named by their SHA-256 digest and
/// the file carries the full key ahead of the value.
///
/// # Durability
///
/// Every write goes to its own temporary file which is synced and then
/// renamed over the target, so a reader never observes a half-written value
/// and overlapping writes to one key resolve to whichever rename lands last.
///
/// # Example
///
/// ```no_run
/// use quire_storage::{FileStore, KeyValueStore};
/// use std::path::Path;
///
/// # async fn demo() -> quire_storage::StorageResult<()> {
/// let store = FileStore::open(Path::new("/var/lib/quire"), "cms_api_cache").await?;
/// store.put("articles", b"[]").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens or creates the namespace directory `root/namespace`.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is not a plain directory name or the
    /// directory cannot be created.
    pub async fn open(root: &Path, namespace: &str) -> StorageResult<Self> {
        if namespace.is_empty()
            || namespace.contains(['/', '\\'])
            || namespace == "."
            || namespace == ".."
        {
            return Err(StorageError::InvalidKey(namespace.to_string()));
        }

        let dir = root.join(namespace);
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    /// Returns the namespace directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, slot: &Slot) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    fn temp_path(&self, slot: &Slot) -> PathBuf {
        self.dir.join(format!(
            "{}.{}.{TEMP_EXT}",
            slot.stem(),
            Uuid::new_v4().simple()
        ))
    }

    async fn read_optional(path: &Path) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn key_from_entry(&self, name: &str) -> StorageResult<Option<String>> {
        if let Some(stem) = name.strip_suffix(&format!(".{VALUE_EXT}")) {
            let key = hex::decode(stem)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok());
            return Ok(key);
        }
        if name.ends_with(&format!(".{HASHED_EXT}")) {
            let data = Self::read_optional(&self.dir.join(name)).await?;
            return Ok(data
                .as_deref()
                .and_then(decode_hashed)
                .map(|(key, _)| key.to_string()));
        }
        Ok(None)
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let slot = Slot::for_key(key);
        let Some(data) = Self::read_optional(&self.value_path(&slot)).await? else {
            return Ok(None);
        };
        match slot {
            Slot::Inline(_) => Ok(Some(data)),
            Slot::Hashed(_) => Ok(decode_hashed(&data)
                .filter(|(stored, _)| *stored == key)
                .map(|(_, value)| value.to_vec())),
        }
    }

    async fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let slot = Slot::for_key(key);
        let contents = match slot {
            Slot::Inline(_) => value.to_vec(),
            Slot::Hashed(_) => encode_hashed(key, value)?,
        };
        let temp = self.temp_path(&slot);

        let write = async {
            let mut file = fs::File::create(&temp).await?;
            tokio::io::AsyncWriteExt::write_all(&mut file, &contents).await?;
            file.sync_all().await?;
            fs::rename(&temp, self.value_path(&slot)).await
        };

        if let Err(e) = write.await {
            // Leave no partial file behind on failure.
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.value_path(&Slot::for_key(key))).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(key) = self.key_from_entry(name).await? {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn clear(&self) -> StorageResult<()> {
        for key in self.keys().await? {
            self.remove(&key).await?;
        }
        Ok(())
    }
}
