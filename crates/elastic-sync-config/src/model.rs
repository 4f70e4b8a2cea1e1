//! Configuration schema for resource synchronization.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Root config describing the cluster endpoint and the resources to sync.
///
/// Field names follow the on-disk format: `cf-endpoint` names a stack export
/// whose value is the cluster endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SyncConfig {
    /// Directly supplied cluster endpoint, with or without scheme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Name of the stack export holding the cluster endpoint.
    #[serde(
        default,
        rename = "cf-endpoint",
        skip_serializing_if = "Option::is_none"
    )]
    pub stack_export_name: Option<String>,
    /// Index mappings to create.
    #[serde(default)]
    pub indices: Vec<ResourceRef>,
    /// Index templates to put.
    #[serde(default)]
    pub templates: Vec<ResourceRef>,
    /// Snapshot repositories, passed through to the repository setup.
    #[serde(default)]
    pub repositories: Vec<Value>,
    /// Any other operator-authored fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SyncConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder::new()
    }

    /// Whether the config names a stack export explicitly.
    pub fn has_stack_reference(&self) -> bool {
        self.stack_export_name.is_some()
    }
}

/// Reference to a named resource and the on-disk location of its body.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ResourceRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl ResourceRef {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            file: Some(file.into()),
        }
    }
}

/// Target provider settings supplied by the host pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Provider name, e.g. `aws`.
    #[serde(default)]
    pub name: Option<String>,
    /// Provider region used for signing.
    #[serde(default)]
    pub region: Option<String>,
    /// Named credential profile used for signing.
    #[serde(default)]
    pub profile: Option<String>,
}

/// Builder for assembling a `SyncConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    /// Create a new builder seeded with an empty config.
    pub fn new() -> Self {
        Self {
            config: SyncConfig::default(),
        }
    }

    /// Set the direct cluster endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Set the stack export that holds the cluster endpoint.
    pub fn stack_export_name(mut self, name: impl Into<String>) -> Self {
        self.config.stack_export_name = Some(name.into());
        self
    }

    /// Append an index reference.
    pub fn index(mut self, index: ResourceRef) -> Self {
        self.config.indices.push(index);
        self
    }

    /// Append a template reference.
    pub fn template(mut self, template: ResourceRef) -> Self {
        self.config.templates.push(template);
        self
    }

    /// Append an opaque repository entry.
    pub fn repository(mut self, repository: Value) -> Self {
        self.config.repositories.push(repository);
        self
    }

    /// Set an additional top-level field.
    pub fn extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.extra.insert(key.into(), value);
        self
    }

    /// Finalize and return the built `SyncConfig`.
    pub fn build(self) -> SyncConfig {
        self.config
    }
}
