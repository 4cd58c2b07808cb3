//! Cache command implementation.

use quire_cache::{CacheConfig, CacheStore};
use serde::Serialize;
use std::path::Path;

/// One line of `cache list`.
#[derive(Debug, Serialize)]
pub struct EntrySummary {
    /// Cache key.
    pub key: String,
    /// Version token stored with the entry.
    pub version: String,
    /// Write time, epoch milliseconds.
    pub stored_at: u64,
    /// Whether the TTL still holds.
    pub fresh: bool,
}

async fn open(data_dir: &Path) -> Result<CacheStore, Box<dyn std::error::Error>> {
    Ok(CacheStore::open(data_dir, &CacheConfig::default()).await?)
}

/// Collects a summary of every readable entry.
pub async fn summarize(store: &CacheStore) -> Result<Vec<EntrySummary>, Box<dyn std::error::Error>> {
    let mut summaries = Vec::new();
    for key in store.keys().await? {
        if let Some(hit) = store.get(&key).await? {
            summaries.push(EntrySummary {
                key,
                version: hit.version,
                stored_at: hit.stored_at,
                fresh: hit.is_fresh,
            });
        }
    }
    Ok(summaries)
}

/// Runs `cache list`.
pub async fn list(data_dir: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open(data_dir).await?;
    let summaries = summarize(&store).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&summaries)?),
        _ => {
            if summaries.is_empty() {
                println!("Cache is empty");
            }
            for s in &summaries {
                let state = if s.fresh { "fresh" } else { "expired" };
                println!("{:<7}  {:<12}  {}", state, s.version, s.key);
            }
        }
    }
    Ok(())
}

/// Runs `cache remove`.
pub async fn remove(data_dir: &Path, key: &str) -> Result<(), Box<dyn std::error::Error>> {
    open(data_dir).await?.remove(key).await?;
    println!("Removed {key}");
    Ok(())
}

/// Runs `cache clear`.
pub async fn clear(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    open(data_dir).await?.clear().await?;
    println!("Cache cleared");
    Ok(())
}
