//! Cluster endpoint derivation.

use crate::SyncError;
use crate::exports::{StackExports, resolve_export};
use elastic_sync_config::SyncConfig;
use log::debug;
use std::fmt;

/// Secure-transport scheme every endpoint carries.
pub const SECURE_SCHEME: &str = "https://";
/// Message when neither `endpoint` nor `cf-endpoint` is configured.
pub const ENDPOINT_NOT_SPECIFIED: &str = "Elasticsearch endpoint not specified.";
/// Message when the named stack export does not exist.
pub const EXPORT_NOT_FOUND: &str = "Endpoint not found at cloudformation export.";

/// Absolute cluster URL, always starting with [`SECURE_SCHEME`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    /// Prefix the scheme unless the value already starts with it.
    ///
    /// The check is an exact, case-sensitive prefix match.
    pub fn new(value: &str) -> Self {
        if value.starts_with(SECURE_SCHEME) {
            Self(value.to_string())
        } else {
            Self(format!("{SECURE_SCHEME}{value}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{endpoint}/{path}`.
    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directly configured endpoint, ignoring blank values.
pub(crate) fn direct_endpoint(config: &SyncConfig) -> Option<&str> {
    config
        .endpoint
        .as_deref()
        .filter(|endpoint| !endpoint.trim().is_empty())
}

/// Named export holding the endpoint, ignoring blank values.
pub(crate) fn endpoint_export(config: &SyncConfig) -> Option<&str> {
    config
        .stack_export_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
}

/// Derive the endpoint from a config.
///
/// A direct `endpoint` wins; otherwise `cf-endpoint` is resolved against the
/// stack. Fails with `Configuration` when neither is set and with `Lookup`
/// when the export is absent.
pub async fn normalize_endpoint(
    exports: &dyn StackExports,
    stack_id: &str,
    config: &SyncConfig,
) -> Result<Endpoint, SyncError> {
    if let Some(endpoint) = direct_endpoint(config) {
        debug!("using configured endpoint");
        return Ok(Endpoint::new(endpoint));
    }
    let Some(export_name) = endpoint_export(config) else {
        return Err(SyncError::Configuration(ENDPOINT_NOT_SPECIFIED.to_string()));
    };
    let value = resolve_export(exports, stack_id, export_name)
        .await?
        .ok_or_else(|| SyncError::Lookup(EXPORT_NOT_FOUND.to_string()))?;
    Ok(Endpoint::new(&value))
}
