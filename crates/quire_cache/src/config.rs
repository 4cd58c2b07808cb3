//! Configuration for the cache.

use std::time::Duration;

/// Configuration for the API cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Storage namespace holding cache entries.
    pub namespace: String,
    /// TTL applied when `set` is called without one.
    pub default_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            namespace: "cms_api_cache".into(),
            default_ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
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

    /// Sets the default TTL.
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.namespace, "cms_api_cache");
        assert_eq!(config.default_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn builder_pattern() {
        let config = CacheConfig::new()
            .with_namespace("other")
            .with_default_ttl(Duration::from_secs(5));
        assert_eq!(config.namespace, "other");
        assert_eq!(config.default_ttl, Duration::from_secs(5));
    }
}
