//! Article service configuration.

use quire_cache::CacheConfig;
use quire_core::TreeConfig;
use quire_drafts::DraftStoreConfig;

/// Configuration for an [`ArticleService`](crate::ArticleService).
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Cache settings.
    pub cache: CacheConfig,
    /// Draft store settings.
    pub drafts: DraftStoreConfig,
    /// Tree settings applied to fetched listings.
    pub tree: TreeConfig,
    /// Commit message used when a save supplies none.
    pub default_commit_message: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            drafts: DraftStoreConfig::default(),
            tree: TreeConfig::default(),
            default_commit_message: "Update article".into(),
        }
    }
}

impl ServiceConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache configuration.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Sets the draft store configuration.
    #[must_use]
    pub fn with_drafts(mut self, drafts: DraftStoreConfig) -> Self {
        self.drafts = drafts;
        self
    }

    /// Sets the tree configuration.
    #[must_use]
    pub fn with_tree(mut self, tree: TreeConfig) -> Self {
        self.tree = tree;
        self
    }

    /// Sets the fallback commit message.
    #[must_use]
    pub fn with_default_commit_message(mut self, message: impl Into<String>) -> Self {
        self.default_commit_message = message.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_namespaces() {
        let config = ServiceConfig::default();
        assert_eq!(config.cache.namespace, "cms_api_cache");
        assert_eq!(config.drafts.namespace, "cms_local_articles");
        assert_eq!(config.default_commit_message, "Update article");
    }

    #[test]
    fn builder_pattern() {
        let config = ServiceConfig::new()
            .with_cache(CacheConfig::new().with_default_ttl(Duration::from_secs(1)))
            .with_tree(TreeConfig::new().with_root_paths(["content"]))
            .with_default_commit_message("docs: edit");
        assert_eq!(config.cache.default_ttl, Duration::from_secs(1));
        assert!(config.tree.root_paths.contains(&"content".to_string()));
        assert_eq!(config.default_commit_message, "docs: edit");
    }
}
