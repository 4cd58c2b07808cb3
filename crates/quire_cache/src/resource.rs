//! Remote resources and the mutations that change them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cache key of the article listing.
pub const ARTICLE_LIST_KEY: &str = "articles";

/// A remote read the cache can serve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "resource", rename_all = "snake_case")]
pub enum Resource {
    /// The article listing.
    ArticleList,
    /// A single article by repository path.
    ArticleDetail {
        /// Repository path of the article.
        path: String,
    },
}

impl Resource {
    /// Creates a detail resource.
    pub fn detail(path: impl Into<String>) -> Self {
        Self::ArticleDetail { path: path.into() }
    }

    /// Returns the cache key for this resource.
    pub fn cache_key(&self) -> String {
        match self {
            Resource::ArticleList => ARTICLE_LIST_KEY.to_string(),
            Resource::ArticleDetail { path } => format!("article:{path}"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}

/// Mutation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Create or update an article.
    Save,
    /// Move an article.
    Rename,
    /// Delete an article.
    Delete,
}

/// A write against the remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Create or update an article.
    Save {
        /// Repository path.
        path: String,
        /// Full file content, front matter included.
        content: String,
        /// Blob sha being replaced; `None` creates the file.
        sha: Option<String>,
        /// Article title, if known.
        title: Option<String>,
        /// Commit message.
        message: Option<String>,
    },
    /// Move an article.
    Rename {
        /// Current path.
        old_path: String,
        /// Target path.
        new_path: String,
        /// Blob sha at the current path.
        sha: String,
    },
    /// Delete an article.
    Delete {
        /// Repository path.
        path: String,
        /// Blob sha being deleted.
        sha: String,
    },
}

impl Mutation {
    /// Returns the kind of this mutation.
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Save { .. } => MutationKind::Save,
            Mutation::Rename { .. } => MutationKind::Rename,
            Mutation::Delete { .. } => MutationKind::Delete,
        }
    }

    /// Returns every resource whose cached copy this mutation invalidates.
    ///
    /// The listing is always affected.
    pub fn affected_resources(&self) -> Vec<Resource> {
        let mut affected = vec![Resource::ArticleList];
        match self {
            Mutation::Save { path, .. } | Mutation::Delete { path, .. } => {
                affected.push(Resource::detail(path.clone()));
            }
            Mutation::Rename {
                old_path, new_path, ..
            } => {
                affected.push(Resource::detail(old_path.clone()));
                affected.push(Resource::detail(new_path.clone()));
            }
        }
        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(mutation: &Mutation) -> Vec<String> {
        mutation
            .affected_resources()
            .iter()
            .map(Resource::cache_key)
            .collect()
    }

    #[test]
    fn cache_keys() {
        assert_eq!(Resource::ArticleList.cache_key(), "articles");
        assert_eq!(
            Resource::detail("src/posts/a.md").cache_key(),
            "article:src/posts/a.md"
        );
    }

    #[test]
    fn save_affects_listing_and_detail() {
        let save = Mutation::Save {
            path: "src/posts/a.md".into(),
            content: "body".into(),
            sha: None,
            title: Some("A".into()),
            message: None,
        };
        assert_eq!(save.kind(), MutationKind::Save);
        assert_eq!(keys(&save), vec!["articles", "article:src/posts/a.md"]);
    }

    #[test]
    fn rename_affects_both_paths() {
        let rename = Mutation::Rename {
            old_path: "src/posts/a.md".into(),
            new_path: "src/posts/b.md".into(),
            sha: "s1".into(),
        };
        assert_eq!(
            keys(&rename),
            vec!["articles", "article:src/posts/a.md", "article:src/posts/b.md"]
        );
    }

    #[test]
    fn delete_affects_listing_and_detail() {
        let delete = Mutation::Delete {
            path: "src/a.md".into(),
            sha: "s1".into(),
        };
        assert_eq!(delete.kind(), MutationKind::Delete);
        assert_eq!(keys(&delete), vec!["articles", "article:src/a.md"]);
    }

    #[test]
    fn mutation_wire_shape() {
        let delete = Mutation::Delete {
            path: "src/a.md".into(),
            sha: "s1".into(),
        };
        let json = serde_json::to_value(&delete).unwrap();
        assert_eq!(json["op"], "delete");
        assert_eq!(json["path"], "src/a.md");
    }
}
