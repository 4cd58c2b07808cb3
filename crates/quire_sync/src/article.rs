//! Remote article projection and draft reconciliation status.

use quire_cache::Provenance;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An article as the remote serves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteArticle {
    /// Repository path. Filled from the request when the remote omits it.
    #[serde(default)]
    pub path: String,
    /// Full file content, front matter included.
    pub content: String,
    /// Blob sha of this revision.
    pub sha: String,
}

/// How a local draft relates to its remote counterpart.
///
/// Comparisons carry the [`Provenance`] of the remote copy they used, so a
/// verdict reached against an offline fallback is never mistaken for one
/// checked against the live remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftStatus {
    /// No readable draft with that id.
    Missing,
    /// Remote and draft agree, ignoring cosmetic differences.
    InSync {
        /// Where the remote copy came from.
        provenance: Provenance,
    },
    /// Remote and draft differ substantively.
    Diverged {
        /// The remote copy the draft was compared with.
        remote: RemoteArticle,
        /// Where the remote copy came from.
        provenance: Provenance,
    },
    /// The draft's path does not exist remotely.
    RemoteMissing,
}

impl DraftStatus {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            DraftStatus::Missing => "missing",
            DraftStatus::InSync { .. } => "in-sync",
            DraftStatus::Diverged { .. } => "diverged",
            DraftStatus::RemoteMissing => "remote-missing",
        }
    }

    /// Returns where the compared remote copy came from, if one was compared.
    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            DraftStatus::InSync { provenance } | DraftStatus::Diverged { provenance, .. } => {
                Some(*provenance)
            }
            DraftStatus::Missing | DraftStatus::RemoteMissing => None,
        }
    }

    /// Returns true if the verdict rests on an offline fallback copy.
    pub fn is_offline(&self) -> bool {
        self.provenance() == Some(Provenance::OfflineFallback)
    }
}

/// Extracts the new blob sha from a mutation response.
///
/// Accepts `{"sha": ...}` at the top level or under `data`.
pub fn response_sha(response: &Value) -> Option<String> {
    response
        .get("sha")
        .and_then(Value::as_str)
        .or_else(|| response.pointer("/data/sha").and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn remote_article_without_path() {
        let article: RemoteArticle =
            serde_json::from_value(json!({"content": "# Hi", "sha": "abc"})).unwrap();
        assert_eq!(article.path, "");
        assert_eq!(article.sha, "abc");
    }

    #[test]
    fn sha_from_response() {
        assert_eq!(response_sha(&json!({"sha": "s1"})).as_deref(), Some("s1"));
        assert_eq!(
            response_sha(&json!({"code": 200, "data": {"sha": "s2"}})).as_deref(),
            Some("s2")
        );
        assert_eq!(response_sha(&json!({"sha": null})), None);
        assert_eq!(response_sha(&Value::Null), None);
    }

    #[test]
    fn status_labels() {
        let in_sync = DraftStatus::InSync {
            provenance: Provenance::VerifiedCache,
        };
        assert_eq!(in_sync.label(), "in-sync");
        assert_eq!(DraftStatus::RemoteMissing.label(), "remote-missing");
    }

    #[test]
    fn status_provenance() {
        let offline = DraftStatus::InSync {
            provenance: Provenance::OfflineFallback,
        };
        assert!(offline.is_offline());
        assert_eq!(offline.provenance(), Some(Provenance::OfflineFallback));

        let fresh = DraftStatus::Diverged {
            remote: RemoteArticle {
                path: "a.md".into(),
                content: "x".into(),
                sha: "s".into(),
            },
            provenance: Provenance::FreshFetch,
        };
        assert!(!fresh.is_offline());
        assert_eq!(DraftStatus::Missing.provenance(), None);
    }
}
