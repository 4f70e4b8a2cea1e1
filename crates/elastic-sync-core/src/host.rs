//! Host-facing entry points: `validate` before the stack changes, `apply`
//! after it.

use crate::SyncError;
use crate::endpoint::{ENDPOINT_NOT_SPECIFIED, Endpoint, direct_endpoint, endpoint_export};
use crate::exports::StackExports;
use crate::loader::{BodyLoader, FsBodyLoader};
use crate::repository::{RepositorySetup, SnapshotRepositories};
use crate::resolver::resolve_config;
use crate::signer::request_options;
use crate::sync::{ResourceSynchronizer, SyncOutcome};
use crate::transport::Transport;
use elastic_sync_config::{ProviderSettings, SyncConfig};
use log::info;
use std::path::Path;
use std::sync::Arc;

/// Facts about the deployment supplied by the host pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostContext {
    /// Identifier of the stack whose exports are consulted.
    pub stack_id: String,
    /// Target provider of the deployment.
    pub provider: ProviderSettings,
}

impl HostContext {
    pub fn new(stack_id: impl Into<String>, provider: ProviderSettings) -> Self {
        Self {
            stack_id: stack_id.into(),
            provider,
        }
    }
}

/// Summary of a successful apply run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub endpoint: Endpoint,
    pub templates: Vec<SyncOutcome>,
    pub indices: Vec<SyncOutcome>,
    /// Number of repository entries handed to the repository setup.
    pub repositories: usize,
}

/// Resource synchronizer wired to its collaborators.
///
/// Stateless between runs; every `apply` is a fresh resolve-then-apply cycle.
pub struct ElasticSync {
    exports: Arc<dyn StackExports>,
    transport: Arc<dyn Transport>,
    loader: Arc<dyn BodyLoader>,
    repositories: Arc<dyn RepositorySetup>,
}

impl ElasticSync {
    pub fn new(
        exports: Arc<dyn StackExports>,
        transport: Arc<dyn Transport>,
        loader: Arc<dyn BodyLoader>,
        repositories: Arc<dyn RepositorySetup>,
    ) -> Self {
        Self {
            exports,
            transport,
            loader,
            repositories,
        }
    }

    /// Wire the filesystem body loader rooted at `cwd` and snapshot
    /// repository setup over the same transport.
    pub fn with_defaults(
        exports: Arc<dyn StackExports>,
        transport: Arc<dyn Transport>,
        cwd: impl AsRef<Path>,
    ) -> Self {
        let loader = Arc::new(FsBodyLoader::new(cwd));
        let repositories = Arc::new(SnapshotRepositories::new(transport.clone()));
        Self::new(exports, transport, loader, repositories)
    }

    /// Validate phase: refuse to proceed when no endpoint can be determined.
    ///
    /// Performs no I/O, so a deployment can abort before any infrastructure
    /// is mutated.
    pub fn validate(&self, config: &SyncConfig) -> Result<(), SyncError> {
        if direct_endpoint(config).is_none() && endpoint_export(config).is_none() {
            return Err(SyncError::Configuration(ENDPOINT_NOT_SPECIFIED.to_string()));
        }
        Ok(())
    }

    /// Apply phase: templates, then indices, then repositories.
    ///
    /// Each collection is fanned out internally; collections never overlap.
    pub async fn apply(
        &self,
        host: &HostContext,
        config: &SyncConfig,
    ) -> Result<SyncReport, SyncError> {
        let resolved = resolve_config(self.exports.as_ref(), host, config).await?;
        let options = request_options(&host.provider);
        let synchronizer = ResourceSynchronizer::new(
            &resolved.endpoint,
            &options,
            self.transport.as_ref(),
            self.loader.as_ref(),
        );

        let templates = synchronizer.sync_templates(&resolved.templates).await?;
        info!("templates settled (count={})", templates.len());
        let indices = synchronizer.sync_indices(&resolved.indices).await?;
        info!("indices settled (count={})", indices.len());

        self.repositories
            .apply(
                &resolved.endpoint,
                options.credentials(),
                &resolved.repositories,
                &options,
            )
            .await?;
        info!(
            "repositories settled (count={})",
            resolved.repositories.len()
        );

        Ok(SyncReport {
            endpoint: resolved.endpoint,
            templates,
            indices,
            repositories: resolved.repositories.len(),
        })
    }
}
