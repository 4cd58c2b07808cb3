//! Transport abstraction over the remote content API.

use crate::error::{TransportError, TransportResult};
use crate::resource::{Mutation, Resource};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// The remote content API.
///
/// Implementations map timeouts to [`TransportError::Unreachable`].
/// The version token identifies the current remote state; any mutation
/// changes it.
#[async_trait]
pub trait ContentTransport: Send + Sync {
    /// Fetches the current remote version token.
    async fn fetch_version_token(&self) -> TransportResult<String>;

    /// Fetches a resource.
    async fn fetch_resource(&self, resource: &Resource) -> TransportResult<Value>;

    /// Applies a mutation and returns the remote's response.
    async fn mutate(&self, mutation: &Mutation) -> TransportResult<Value>;
}

/// A mock transport for testing.
///
/// Serves canned responses and counts calls. While disconnected every call
/// fails as unreachable.
#[derive(Debug)]
pub struct MockTransport {
    connected: AtomicBool,
    version: Mutex<String>,
    resources: Mutex<HashMap<Resource, Value>>,
    mutate_response: Mutex<Option<TransportResult<Value>>>,
    mutations: Mutex<Vec<Mutation>>,
    version_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Creates a connected mock at version `v1`.
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            version: Mutex::new("v1".into()),
            resources: Mutex::new(HashMap::new()),
            mutate_response: Mutex::new(None),
            mutations: Mutex::new(Vec::new()),
            version_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Sets the version token the remote reports.
    pub fn set_version(&self, version: impl Into<String>) {
        *self.version.lock() = version.into();
    }

    /// Sets the payload served for a resource.
    pub fn set_resource(&self, resource: Resource, payload: Value) {
        self.resources.lock().insert(resource, payload);
    }

    /// Sets the result of the next mutations.
    pub fn set_mutate_response(&self, response: TransportResult<Value>) {
        *self.mutate_response.lock() = Some(response);
    }

    /// Sets the connected state.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Returns the number of version token requests served.
    pub fn version_calls(&self) -> usize {
        self.version_calls.load(Ordering::SeqCst)
    }

    /// Returns the number of resource fetches served.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Returns the mutations received so far.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.mutations.lock().clone()
    }

    fn check_connected(&self) -> TransportResult<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(TransportError::unreachable("mock transport disconnected"))
        }
    }
}

#[async_trait]
impl ContentTransport for MockTransport {
    async fn fetch_version_token(&self) -> TransportResult<String> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        self.check_connected()?;
        Ok(self.version.lock().clone())
    }

    async fn fetch_resource(&self, resource: &Resource) -> TransportResult<Value> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_connected()?;
        self.resources
            .lock()
            .get(resource)
            .cloned()
            .ok_or_else(|| TransportError::remote(404, format!("no mock response for {resource}")))
    }

    async fn mutate(&self, mutation: &Mutation) -> TransportResult<Value> {
        self.check_connected()?;
        self.mutations.lock().push(mutation.clone());
        self.mutate_response
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn mock_serves_version_and_resources() {
        let transport = MockTransport::new();
        transport.set_version("abc");
        transport.set_resource(Resource::ArticleList, json!([1, 2]));

        assert_eq!(transport.fetch_version_token().await.unwrap(), "abc");
        assert_eq!(
            transport.fetch_resource(&Resource::ArticleList).await.unwrap(),
            json!([1, 2])
        );
        assert_eq!(transport.version_calls(), 1);
        assert_eq!(transport.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn missing_resource_is_remote_error() {
        let transport = MockTransport::new();
        let err = transport
            .fetch_resource(&Resource::detail("nope.md"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Remote { code: 404, .. }));
    }

    #[tokio::test]
    async fn disconnected_is_unreachable() {
        let transport = MockTransport::new();
        transport.set_connected(false);
        assert!(transport
            .fetch_version_token()
            .await
            .unwrap_err()
            .is_unreachable());
        let delete = Mutation::Delete {
            path: "a.md".into(),
            sha: "s".into(),
        };
        assert!(transport.mutate(&delete).await.unwrap_err().is_unreachable());
        assert!(transport.mutations().is_empty());
    }

    #[tokio::test]
    async fn mutations_are_recorded() {
        let transport = MockTransport::new();
        transport.set_mutate_response(Err(TransportError::remote(409, "conflict")));
        let delete = Mutation::Delete {
            path: "a.md".into(),
            sha: "s".into(),
        };
        let err = transport.mutate(&delete).await.unwrap_err();
        assert_eq!(err, TransportError::remote(409, "conflict"));
        assert_eq!(transport.mutations(), vec![delete]);
    }
}
