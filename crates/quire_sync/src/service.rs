//! Article service.

use crate::article::{response_sha, DraftStatus, RemoteArticle};
use crate::config::ServiceConfig;
use crate::error::{SyncError, SyncResult};
use quire_cache::{
    CacheStore, ContentTransport, Mutation, Provenance, Resource, VersionGatedCache,
};
use quire_core::{log_consistency_check, ConsistencyOutcome, Tree, TreeConfig, TreeNode};
use quire_drafts::{DraftStore, EncryptionKey, LocalArticle};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Reads and writes articles through the version-gated cache and keeps
/// local drafts reconciled with the remote.
///
/// # Example
///
/// ```ignore
/// let service = ArticleService::open(data_dir, ServiceConfig::default(), transport, key).await?;
/// let (tree, provenance) = service.list_tree().await?;
/// match service.reconcile_draft(id).await? {
///     DraftStatus::Diverged { remote, provenance } => {
///         println!("remote changed: {} ({provenance})", remote.sha)
///     }
///     status => println!("{}", status.label()),
/// }
/// ```
pub struct ArticleService<T> {
    cache: VersionGatedCache<T>,
    drafts: DraftStore,
    tree: TreeConfig,
    default_commit_message: String,
}

impl<T> ArticleService<T>
where
    T: ContentTransport + 'static,
{
    /// Creates a service from already constructed parts.
    pub fn new(cache: VersionGatedCache<T>, drafts: DraftStore, config: &ServiceConfig) -> Self {
        Self {
            cache,
            drafts,
            tree: config.tree.clone(),
            default_commit_message: config.default_commit_message.clone(),
        }
    }

    /// Opens file-backed cache and draft stores under `root`.
    pub async fn open(
        root: &Path,
        config: ServiceConfig,
        transport: Arc<T>,
        key: EncryptionKey,
    ) -> SyncResult<Self> {
        let store = CacheStore::open(root, &config.cache).await?;
        let drafts = DraftStore::open(root, &config.drafts, key).await?;
        Ok(Self::new(
            VersionGatedCache::new(store, transport),
            drafts,
            &config,
        ))
    }

    /// Returns the cache.
    pub fn cache(&self) -> &VersionGatedCache<T> {
        &self.cache
    }

    /// Returns the draft store.
    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// Returns the content tree.
    pub async fn list_tree(&self) -> SyncResult<(Tree, Provenance)> {
        let (nodes, provenance): (Vec<TreeNode>, _) =
            self.cache.read_as(&Resource::ArticleList).await?;
        debug!(nodes = nodes.len(), %provenance, "article tree loaded");
        Ok((Tree::with_config(self.tree.clone(), nodes), provenance))
    }

    /// Returns the remote article at `path`.
    pub async fn article(&self, path: &str) -> SyncResult<(RemoteArticle, Provenance)> {
        let (mut article, provenance): (RemoteArticle, _) =
            self.cache.read_as(&Resource::detail(path)).await?;
        if article.path.is_empty() {
            article.path = path.to_string();
        }
        Ok((article, provenance))
    }

    /// Creates or updates the article at `path`.
    ///
    /// Pass the sha being replaced, or `None` to create the file. Without a
    /// `message` the configured default commit message is used. Returns the
    /// new blob sha when the remote reports one.
    pub async fn save_article(
        &self,
        path: &str,
        content: &str,
        sha: Option<&str>,
        title: Option<&str>,
        message: Option<&str>,
    ) -> SyncResult<Option<String>> {
        let mutation = Mutation::Save {
            path: path.to_string(),
            content: content.to_string(),
            sha: sha.map(str::to_string),
            title: title.map(str::to_string),
            message: Some(message.unwrap_or(&self.default_commit_message).to_string()),
        };
        let response = self.apply(&mutation).await?;
        Ok(response_sha(&response))
    }

    /// Moves the article at `old_path` to `new_path`.
    pub async fn rename_article(
        &self,
        old_path: &str,
        new_path: &str,
        sha: &str,
    ) -> SyncResult<Option<String>> {
        let mutation = Mutation::Rename {
            old_path: old_path.to_string(),
            new_path: new_path.to_string(),
            sha: sha.to_string(),
        };
        let response = self.apply(&mutation).await?;
        Ok(response_sha(&response))
    }

    /// Deletes the article at `path`.
    pub async fn delete_article(&self, path: &str, sha: &str) -> SyncResult<()> {
        let mutation = Mutation::Delete {
            path: path.to_string(),
            sha: sha.to_string(),
        };
        self.apply(&mutation).await?;
        Ok(())
    }

    /// Compares the draft `id` with its remote counterpart.
    ///
    /// Cosmetic differences (whitespace, small front matter drift) count as
    /// in sync. The status carries the provenance of the remote copy, so a
    /// comparison made against an offline fallback is flagged as such.
    pub async fn reconcile_draft(&self, id: Uuid) -> SyncResult<DraftStatus> {
        let Some(draft) = self.drafts.load(id).await? else {
            return Ok(DraftStatus::Missing);
        };

        let (remote, provenance) = match self.article(&draft.path).await {
            Ok(read) => read,
            Err(e) if e.is_remote_not_found() => {
                debug!(%id, path = %draft.path, "draft has no remote counterpart");
                return Ok(DraftStatus::RemoteMissing);
            }
            Err(e) => return Err(e),
        };

        let outcome = ConsistencyOutcome::classify(&remote.content, &draft.content);
        log_consistency_check(&draft.path, outcome, Some(&remote.sha));
        if provenance == Provenance::OfflineFallback {
            warn!(%id, path = %draft.path, "draft compared against offline fallback");
        }
        Ok(match outcome {
            ConsistencyOutcome::Mismatch => DraftStatus::Diverged { remote, provenance },
            ConsistencyOutcome::Match | ConsistencyOutcome::Ignored => {
                DraftStatus::InSync { provenance }
            }
        })
    }

    /// Writes the draft `id` to the remote and marks it synced.
    ///
    /// `sha` is the remote blob being replaced, or `None` for a new file.
    /// Returns the new blob sha when the remote reports one.
    ///
    /// # Errors
    ///
    /// [`SyncError::DraftNotFound`] when no readable draft has this id. A
    /// remote failure leaves the draft unsynced.
    pub async fn push_draft(&self, id: Uuid, sha: Option<&str>) -> SyncResult<Option<String>> {
        let mut draft = self
            .drafts
            .load(id)
            .await?
            .ok_or(SyncError::DraftNotFound(id))?;

        let new_sha = self
            .save_article(&draft.path, &draft.content, sha, Some(&draft.title), None)
            .await?;

        draft.mark_synced();
        self.drafts.save(&draft).await?;
        info!(%id, path = %draft.path, "draft pushed");
        Ok(new_sha)
    }

    /// Saves `draft` locally without touching the remote.
    pub async fn save_draft(&self, draft: &LocalArticle) -> SyncResult<()> {
        self.drafts.save(draft).await?;
        Ok(())
    }

    /// Waits for pending cache refreshes, then stops accepting new ones.
    pub async fn shutdown(&self) {
        self.cache.wait_for_refreshes().await;
        self.cache.shutdown().await;
    }

    async fn apply(&self, mutation: &Mutation) -> SyncResult<Value> {
        let response = self.cache.transport().mutate(mutation).await?;
        info!(kind = ?mutation.kind(), "mutation applied");

        // The remote version token has moved on, so a leftover entry can
        // only ever be served as an offline fallback.
        if let Err(e) = self.cache.invalidate_for(mutation).await {
            warn!(error = %e, kind = ?mutation.kind(), "cache invalidation failed");
        }
        Ok(response)
    }
}

impl<T> std::fmt::Debug for ArticleService<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleService")
            .field("cache", &self.cache)
            .field("drafts", &self.drafts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_cache::{CacheConfig, MockTransport, TransportError};
    use quire_storage::InMemoryStore;
    use serde_json::json;

    fn service() -> (ArticleService<MockTransport>, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let store = CacheStore::new(Arc::new(InMemoryStore::new()), &CacheConfig::default());
        let drafts = DraftStore::new(Arc::new(InMemoryStore::new()), EncryptionKey::generate());
        let service = ArticleService::new(
            VersionGatedCache::new(store, Arc::clone(&transport)),
            drafts,
            &ServiceConfig::default(),
        );
        (service, transport)
    }

    #[tokio::test]
    async fn list_tree_decodes_listing() {
        let (service, transport) = service();
        transport.set_resource(
            Resource::ArticleList,
            json!([
                {"name": "a.md", "path": "src/posts/a.md", "type": "file"},
                {"name": "2024", "path": "src/posts/2024", "type": "folder", "children": []}
            ]),
        );

        let (tree, provenance) = service.list_tree().await.unwrap();
        assert_eq!(provenance, Provenance::FreshFetch);
        assert_eq!(tree.children_of("src/posts").len(), 2);
    }

    #[tokio::test]
    async fn malformed_listing_is_codec_error() {
        let (service, transport) = service();
        transport.set_resource(Resource::ArticleList, json!({"not": "a list"}));
        assert!(matches!(
            service.list_tree().await.unwrap_err(),
            SyncError::Codec(_)
        ));
    }

    #[tokio::test]
    async fn article_fills_missing_path() {
        let (service, transport) = service();
        transport.set_resource(
            Resource::detail("src/a.md"),
            json!({"content": "body", "sha": "s1"}),
        );
        let (article, _) = service.article("src/a.md").await.unwrap();
        assert_eq!(article.path, "src/a.md");
        assert_eq!(article.sha, "s1");
    }

    #[tokio::test]
    async fn reconcile_missing_draft() {
        let (service, _) = service();
        assert_eq!(
            service.reconcile_draft(Uuid::new_v4()).await.unwrap(),
            DraftStatus::Missing
        );
    }

    #[tokio::test]
    async fn reconcile_ignores_whitespace() {
        let (service, transport) = service();
        let draft = LocalArticle::new("A", "Hello  world\n", "src/a.md");
        service.save_draft(&draft).await.unwrap();
        transport.set_resource(
            Resource::detail("src/a.md"),
            json!({"content": "Hello world", "sha": "s1"}),
        );

        assert_eq!(
            service.reconcile_draft(draft.id).await.unwrap(),
            DraftStatus::InSync {
                provenance: Provenance::FreshFetch
            }
        );
    }

    #[tokio::test]
    async fn reconcile_offline_is_flagged_as_fallback() {
        let (service, transport) = service();
        let draft = LocalArticle::new("A", "body", "src/a.md");
        service.save_draft(&draft).await.unwrap();
        transport.set_resource(
            Resource::detail("src/a.md"),
            json!({"content": "body", "sha": "s1"}),
        );
        service.article("src/a.md").await.unwrap();
        service.cache().wait_for_refreshes().await;

        transport.set_resource(
            Resource::detail("src/a.md"),
            json!({"content": "changed elsewhere", "sha": "s2"}),
        );
        transport.set_version("v2");
        transport.set_connected(false);

        let status = service.reconcile_draft(draft.id).await.unwrap();
        assert_eq!(
            status,
            DraftStatus::InSync {
                provenance: Provenance::OfflineFallback
            }
        );
        assert!(status.is_offline());
    }

    #[tokio::test]
    async fn reconcile_reports_divergence() {
        let (service, transport) = service();
        let draft = LocalArticle::new("A", "local edit", "src/a.md");
        service.save_draft(&draft).await.unwrap();
        transport.set_resource(
            Resource::detail("src/a.md"),
            json!({"content": "remote edit", "sha": "s2"}),
        );

        match service.reconcile_draft(draft.id).await.unwrap() {
            DraftStatus::Diverged { remote, provenance } => {
                assert_eq!(remote.sha, "s2");
                assert_eq!(provenance, Provenance::FreshFetch);
            }
            other => panic!("expected divergence, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reconcile_remote_missing() {
        let (service, _) = service();
        let draft = LocalArticle::new("A", "new", "src/new.md");
        service.save_draft(&draft).await.unwrap();
        assert_eq!(
            service.reconcile_draft(draft.id).await.unwrap(),
            DraftStatus::RemoteMissing
        );
    }

    #[tokio::test]
    async fn reconcile_unreachable_without_cache_fails() {
        let (service, transport) = service();
        let draft = LocalArticle::new("A", "x", "src/a.md");
        service.save_draft(&draft).await.unwrap();
        transport.set_connected(false);
        assert!(service
            .reconcile_draft(draft.id)
            .await
            .unwrap_err()
            .is_unreachable());
    }

    #[tokio::test]
    async fn push_marks_draft_synced() {
        let (service, transport) = service();
        transport.set_mutate_response(Ok(json!({"code": 200, "sha": "new-sha"})));
        let draft = LocalArticle::new("A", "body", "src/a.md");
        service.save_draft(&draft).await.unwrap();

        let sha = service.push_draft(draft.id, Some("old-sha")).await.unwrap();
        assert_eq!(sha.as_deref(), Some("new-sha"));

        let stored = service.drafts().load(draft.id).await.unwrap().unwrap();
        assert!(stored.is_synced);
        assert_eq!(stored.updated_at, draft.updated_at);

        match &transport.mutations()[..] {
            [Mutation::Save { path, sha, title, .. }] => {
                assert_eq!(path, "src/a.md");
                assert_eq!(sha.as_deref(), Some("old-sha"));
                assert_eq!(title.as_deref(), Some("A"));
            }
            other => panic!("unexpected mutations {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_push_leaves_draft_unsynced() {
        let (service, transport) = service();
        transport.set_mutate_response(Err(TransportError::remote(409, "sha mismatch")));
        let draft = LocalArticle::new("A", "body", "src/a.md");
        service.save_draft(&draft).await.unwrap();

        let err = service.push_draft(draft.id, None).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Transport(TransportError::Remote { code: 409, .. })
        ));
        let stored = service.drafts().load(draft.id).await.unwrap().unwrap();
        assert!(!stored.is_synced);
    }

    #[tokio::test]
    async fn save_uses_given_or_default_message() {
        let (service, transport) = service();
        service
            .save_article("src/a.md", "a", None, None, Some("docs: typo"))
            .await
            .unwrap();
        service
            .save_article("src/b.md", "b", None, None, None)
            .await
            .unwrap();

        let messages: Vec<Option<String>> = transport
            .mutations()
            .into_iter()
            .map(|m| match m {
                Mutation::Save { message, .. } => message,
                other => panic!("unexpected mutation {other:?}"),
            })
            .collect();
        assert_eq!(
            messages,
            vec![Some("docs: typo".to_string()), Some("Update article".to_string())]
        );
    }

    #[tokio::test]
    async fn push_unknown_draft() {
        let (service, _) = service();
        let id = Uuid::new_v4();
        assert!(matches!(
            service.push_draft(id, None).await.unwrap_err(),
            SyncError::DraftNotFound(missing) if missing == id
        ));
    }

    #[tokio::test]
    async fn delete_invalidates_cached_keys() {
        let (service, _) = service();
        let store = service.cache().store();
        store.set("articles", json!([]), "v1").await.unwrap();
        store.set("article:src/a.md", json!({}), "v1").await.unwrap();
        store.set("article:src/b.md", json!({}), "v1").await.unwrap();

        service.delete_article("src/a.md", "s1").await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["article:src/b.md"]);
    }
}
