//! Drafts command implementation.

use quire_drafts::{DraftStore, DraftStoreConfig, LocalArticle};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

/// Environment variable holding the draft passphrase.
pub const PASSPHRASE_ENV: &str = "QUIRE_DRAFT_PASSPHRASE";

/// One line of `drafts list`.
#[derive(Debug, Serialize)]
pub struct DraftSummary {
    /// Draft id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Virtual path.
    pub path: String,
    /// Last local change, epoch milliseconds.
    pub updated_at: u64,
    /// Whether the remote holds this version.
    pub synced: bool,
}

impl From<&LocalArticle> for DraftSummary {
    fn from(draft: &LocalArticle) -> Self {
        Self {
            id: draft.id.to_string(),
            title: draft.title.clone(),
            path: draft.path.clone(),
            updated_at: draft.updated_at,
            synced: draft.is_synced,
        }
    }
}

/// Opens the draft store under `data_dir` with `passphrase`.
pub async fn open_store(
    data_dir: &Path,
    passphrase: &str,
) -> Result<DraftStore, Box<dyn std::error::Error>> {
    let config = DraftStoreConfig::default();
    let key = config.derive_key(passphrase)?;
    Ok(DraftStore::open(data_dir, &config, key).await?)
}

async fn open_from_env(data_dir: &Path) -> Result<DraftStore, Box<dyn std::error::Error>> {
    let passphrase = std::env::var(PASSPHRASE_ENV)
        .map_err(|_| format!("{PASSPHRASE_ENV} must be set to open drafts"))?;
    open_store(data_dir, &passphrase).await
}

/// Runs `drafts list`.
pub async fn list(data_dir: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_from_env(data_dir).await?;
    let summaries: Vec<DraftSummary> = store.list_all().await?.iter().map(Into::into).collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summaries)?),
        _ => {
            if summaries.is_empty() {
                println!("No drafts");
            }
            for s in &summaries {
                let state = if s.synced { "synced" } else { "unsynced" };
                println!("{}  {:<8}  {}  {}", s.id, state, s.path, s.title);
            }
        }
    }
    Ok(())
}

/// Runs `drafts show`.
pub async fn show(data_dir: &Path, id: &str, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = Uuid::parse_str(id)?;
    let store = open_from_env(data_dir).await?;
    let draft = store
        .load(id)
        .await?
        .ok_or_else(|| format!("No readable draft {id}"))?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&draft)?),
        _ => {
            println!("Id:       {}", draft.id);
            println!("Title:    {}", draft.title);
            println!("Path:     {}", draft.path);
            println!("Updated:  {}", draft.updated_at);
            println!("Synced:   {}", draft.is_synced);
            println!();
            println!("{}", draft.content);
        }
    }
    Ok(())
}

/// Runs `drafts remove`.
pub async fn remove(data_dir: &Path, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = Uuid::parse_str(id)?;
    let store = open_from_env(data_dir).await?;
    store.remove(id).await?;
    println!("Removed draft {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn store_opened_with_same_passphrase_reads_drafts() {
        let dir = TempDir::new().unwrap();
        let draft = LocalArticle::new("T", "body", "src/posts/t.md");
        open_store(dir.path(), "secret")
            .await
            .unwrap()
            .save(&draft)
            .await
            .unwrap();

        let store = open_store(dir.path(), "secret").await.unwrap();
        assert_eq!(store.load(draft.id).await.unwrap(), Some(draft.clone()));

        let other = open_store(dir.path(), "other").await.unwrap();
        assert!(other.load(draft.id).await.unwrap().is_none());
        assert!(other.list_all().await.unwrap().is_empty());
    }

    #[test]
    fn summary_from_draft() {
        let mut draft = LocalArticle::new("T", "body", "src/posts/t.md");
        draft.mark_synced();
        let summary = DraftSummary::from(&draft);
        assert_eq!(summary.id, draft.id.to_string());
        assert!(summary.synced);
    }
}
