//! Snapshot repository setup.

use crate::SyncError;
use crate::endpoint::Endpoint;
use crate::signer::{RequestOptions, SignedRequestParams};
use crate::transport::{PutRequest, Transport};
use async_trait::async_trait;
use futures_util::future::join_all;
use log::{debug, info};
use serde_json::{Value, json};
use std::sync::Arc;

/// Collaborator that receives the repository collection once per run.
///
/// Entries are passed through as authored; their shape is owned by the
/// implementation.
#[async_trait]
pub trait RepositorySetup: Send + Sync {
    async fn apply(
        &self,
        base_url: &Endpoint,
        credentials: Option<&SignedRequestParams>,
        repos: &[Value],
        options: &RequestOptions,
    ) -> Result<(), SyncError>;
}

/// Registers `{ name, type, settings }` entries at `{endpoint}/_snapshot/{name}`.
pub struct SnapshotRepositories {
    transport: Arc<dyn Transport>,
}

impl SnapshotRepositories {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn register(
        &self,
        base_url: &Endpoint,
        repo: &Value,
        options: &RequestOptions,
    ) -> Result<(), SyncError> {
        let name = repo
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SyncError::Validation("Repository does not have a name.".to_string()))?;
        let repo_type = repo
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| SyncError::Validation("Repository does not have a type.".to_string()))?;
        let settings = repo.get("settings").cloned().unwrap_or_else(|| json!({}));
        let body = json!({ "type": repo_type, "settings": settings });

        let url = base_url.join(&format!("_snapshot/{name}"));
        self.transport
            .put(&url, PutRequest::json(body, options))
            .await?;
        info!("repository registered (name={name}, type={repo_type})");
        Ok(())
    }
}

#[async_trait]
impl RepositorySetup for SnapshotRepositories {
    async fn apply(
        &self,
        base_url: &Endpoint,
        credentials: Option<&SignedRequestParams>,
        repos: &[Value],
        options: &RequestOptions,
    ) -> Result<(), SyncError> {
        debug!(
            "repository setup (count={}, signed={})",
            repos.len(),
            credentials.is_some()
        );
        let results = join_all(
            repos
                .iter()
                .map(|repo| self.register(base_url, repo, options)),
        )
        .await;
        results.into_iter().collect()
    }
}
