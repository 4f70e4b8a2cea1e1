//! Idempotent application of index and template resources.
//!
//! Every entry of a collection is validated, loaded and PUT independently and
//! concurrently. The collection settles only after every entry has finished;
//! it then fails with the first failure in entry order, if any.

use crate::SyncError;
use crate::endpoint::Endpoint;
use crate::loader::BodyLoader;
use crate::signer::RequestOptions;
use crate::transport::{PutRequest, Transport};
use elastic_sync_config::ResourceRef;
use futures_util::future::join_all;
use log::{info, warn};

/// Kind of a resource collection, which fixes URL shape and conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Index,
    Template,
}

impl ResourceKind {
    /// Label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Index => "Index",
            ResourceKind::Template => "Template",
        }
    }

    /// Target URL for a resource of this kind.
    pub fn target_url(self, endpoint: &Endpoint, name: &str) -> String {
        match self {
            ResourceKind::Index => endpoint.join(name),
            ResourceKind::Template => endpoint.join(&format!("_template/{name}")),
        }
    }

    /// Whether an "already exists" failure counts as a no-op.
    pub fn tolerates_conflict(self) -> bool {
        matches!(self, ResourceKind::Index)
    }
}

/// Result of applying a single resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The PUT succeeded.
    Applied { kind: ResourceKind, name: String },
    /// The resource already existed; nothing changed.
    SuppressedConflict { kind: ResourceKind, name: String },
}

impl SyncOutcome {
    pub fn name(&self) -> &str {
        match self {
            SyncOutcome::Applied { name, .. } | SyncOutcome::SuppressedConflict { name, .. } => {
                name
            }
        }
    }
}

/// Check that an entry carries both a name and a file.
pub fn validate_entry(
    kind: ResourceKind,
    entry: &ResourceRef,
) -> Result<(&str, &str), SyncError> {
    let name = entry.name.as_deref().ok_or_else(|| {
        SyncError::Validation(format!("{} does not have a name.", kind.label()))
    })?;
    let file = entry.file.as_deref().ok_or_else(|| {
        SyncError::Validation(format!("{} does not have a file location.", kind.label()))
    })?;
    Ok((name, file))
}

/// Applies resource collections against one endpoint.
pub struct ResourceSynchronizer<'a> {
    endpoint: &'a Endpoint,
    options: &'a RequestOptions,
    transport: &'a dyn Transport,
    loader: &'a dyn BodyLoader,
}

impl<'a> ResourceSynchronizer<'a> {
    pub fn new(
        endpoint: &'a Endpoint,
        options: &'a RequestOptions,
        transport: &'a dyn Transport,
        loader: &'a dyn BodyLoader,
    ) -> Self {
        Self {
            endpoint,
            options,
            transport,
            loader,
        }
    }

    /// PUT every template to `{endpoint}/_template/{name}`.
    pub async fn sync_templates(
        &self,
        templates: &[ResourceRef],
    ) -> Result<Vec<SyncOutcome>, SyncError> {
        self.sync_collection(ResourceKind::Template, templates).await
    }

    /// PUT every index to `{endpoint}/{name}`, tolerating existing indices.
    pub async fn sync_indices(
        &self,
        indices: &[ResourceRef],
    ) -> Result<Vec<SyncOutcome>, SyncError> {
        self.sync_collection(ResourceKind::Index, indices).await
    }

    async fn sync_collection(
        &self,
        kind: ResourceKind,
        entries: &[ResourceRef],
    ) -> Result<Vec<SyncOutcome>, SyncError> {
        let results = join_all(entries.iter().map(|entry| self.sync_entry(kind, entry))).await;

        let mut outcomes = Vec::with_capacity(results.len());
        let mut first_failure = None;
        for result in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    warn!("{} sync failed: {err}", kind.label());
                    first_failure.get_or_insert(err);
                }
            }
        }
        match first_failure {
            Some(err) => Err(err),
            None => Ok(outcomes),
        }
    }

    async fn sync_entry(
        &self,
        kind: ResourceKind,
        entry: &ResourceRef,
    ) -> Result<SyncOutcome, SyncError> {
        let (name, file) = validate_entry(kind, entry)?;
        let url = kind.target_url(self.endpoint, name);
        let body = self.loader.load(file).await?;

        match self
            .transport
            .put(&url, PutRequest::json(body, self.options))
            .await
        {
            Ok(()) => {
                info!("{} applied (name={name})", kind.label());
                Ok(SyncOutcome::Applied {
                    kind,
                    name: name.to_string(),
                })
            }
            Err(SyncError::Remote(failure))
                if kind.tolerates_conflict() && failure.is_already_exists() =>
            {
                info!("{} already exists (name={name})", kind.label());
                Ok(SyncOutcome::SuppressedConflict {
                    kind,
                    name: name.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ResourceKind, validate_entry};
    use crate::endpoint::Endpoint;
    use elastic_sync_config::ResourceRef;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_target_urls_per_kind() {
        let endpoint = Endpoint::new("search.internal");
        assert_eq!(
            ResourceKind::Index.target_url(&endpoint, "orders"),
            "https://search.internal/orders"
        );
        assert_eq!(
            ResourceKind::Template.target_url(&endpoint, "logs"),
            "https://search.internal/_template/logs"
        );
    }

    #[test]
    fn only_indices_tolerate_conflicts() {
        assert!(ResourceKind::Index.tolerates_conflict());
        assert!(!ResourceKind::Template.tolerates_conflict());
    }

    #[test]
    fn validation_messages_name_the_kind() {
        let missing_name = ResourceRef {
            name: None,
            file: Some("a.json".to_string()),
        };
        let missing_file = ResourceRef {
            name: Some("a".to_string()),
            file: None,
        };
        assert_eq!(
            validate_entry(ResourceKind::Index, &missing_name)
                .unwrap_err()
                .to_string(),
            "Index does not have a name."
        );
        assert_eq!(
            validate_entry(ResourceKind::Template, &missing_file)
                .unwrap_err()
                .to_string(),
            "Template does not have a file location."
        );
        assert_eq!(
            validate_entry(ResourceKind::Index, &ResourceRef::new("a", "a.json")).expect("valid"),
            ("a", "a.json")
        );
    }
}
