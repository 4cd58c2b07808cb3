//! Local draft record and its sync state machine.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Sync state of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// Local changes not yet written to the remote.
    Unsynced,
    /// The last local version was written to the remote.
    Synced,
}

/// A document held in the local draft store.
///
/// ```text
/// new() ──► Unsynced ──edit/rename──► Unsynced
///               │
///          mark_synced()
///               ▼
///            Synced ──edit/rename──► Unsynced
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalArticle {
    /// Locally generated id; stable across renames.
    pub id: Uuid,
    /// Document title.
    pub title: String,
    /// Document body, including any front matter.
    pub content: String,
    /// Virtual path, e.g. `src/posts/2026/hello.md`.
    pub path: String,
    /// Time of the last local mutation, in epoch milliseconds.
    pub updated_at: u64,
    /// Whether the remote holds this version.
    pub is_synced: bool,
}

impl LocalArticle {
    /// Creates a new unsynced draft with a fresh id.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            path: path.into(),
            updated_at: now_millis(),
            is_synced: false,
        }
    }

    /// Returns the sync state.
    pub fn state(&self) -> DraftState {
        if self.is_synced {
            DraftState::Synced
        } else {
            DraftState::Unsynced
        }
    }

    /// Replaces the title and body.
    pub fn edit(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = title.into();
        self.content = content.into();
        self.touch();
    }

    /// Moves the draft to a new path, keeping its id.
    pub fn rename(&mut self, path: impl Into<String>) {
        self.path = path.into();
        self.touch();
    }

    /// Records a successful remote write of the current version.
    pub fn mark_synced(&mut self) {
        self.is_synced = true;
    }

    fn touch(&mut self) {
        // Never go backwards, even if the wall clock does.
        self.updated_at = now_millis().max(self.updated_at);
        self.is_synced = false;
    }
}
