//! Resolution of stack references inside a raw config.
//!
//! String values may carry `${cf:<ExportName>}` tokens. When introspection is
//! triggered every token is replaced with the export's value; the endpoint is
//! then derived from the substituted config.

use crate::endpoint::{EXPORT_NOT_FOUND, Endpoint, normalize_endpoint};
use crate::exports::{StackExports, resolve_export};
use crate::{HostContext, SyncError};
use elastic_sync_config::{ConfigError, ResourceRef, SyncConfig};
use log::{debug, info, warn};
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Provider whose stacks publish the exports referenced by the config.
pub const STACK_PROVIDER: &str = "aws";

static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{cf:([^}\s]+)\}").expect("valid reference pattern"));

/// Config with every stack reference substituted and the endpoint derived.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub endpoint: Endpoint,
    pub indices: Vec<ResourceRef>,
    pub templates: Vec<ResourceRef>,
    pub repositories: Vec<Value>,
    pub extra: BTreeMap<String, Value>,
}

impl ResolvedConfig {
    fn new(endpoint: Endpoint, config: SyncConfig) -> Self {
        Self {
            endpoint,
            indices: config.indices,
            templates: config.templates,
            repositories: config.repositories,
            extra: config.extra,
        }
    }
}

/// A reference that could not be resolved, by JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Unresolved {
    path: String,
    export: String,
}

/// Whether stack introspection is needed for this run.
///
/// Only targets on the stack provider, or configs naming `cf-endpoint`,
/// pay for export lookups.
pub fn needs_stack_introspection(host: &HostContext, config: &SyncConfig) -> bool {
    host.provider.name.as_deref() == Some(STACK_PROVIDER) || config.has_stack_reference()
}

/// Resolve a raw config into a [`ResolvedConfig`].
///
/// Unresolved references become absent fields, except inside `endpoint` or
/// `cf-endpoint` where they are a `Lookup` error.
pub async fn resolve_config(
    exports: &dyn StackExports,
    host: &HostContext,
    raw: &SyncConfig,
) -> Result<ResolvedConfig, SyncError> {
    let config = if needs_stack_introspection(host, raw) {
        substitute_references(exports, &host.stack_id, raw).await?
    } else {
        debug!("stack introspection not needed; using raw config");
        raw.clone()
    };
    let endpoint = normalize_endpoint(exports, &host.stack_id, &config).await?;
    info!("config resolved (endpoint={endpoint})");
    Ok(ResolvedConfig::new(endpoint, config))
}

async fn substitute_references(
    exports: &dyn StackExports,
    stack_id: &str,
    raw: &SyncConfig,
) -> Result<SyncConfig, SyncError> {
    let mut value = serde_json::to_value(raw).map_err(ConfigError::from)?;

    let mut names = BTreeSet::new();
    collect_references(&value, &mut names);
    if names.is_empty() {
        return Ok(raw.clone());
    }

    let mut resolved = BTreeMap::new();
    for name in names {
        let export = resolve_export(exports, stack_id, &name).await?;
        resolved.insert(name, export);
    }

    let mut unresolved = Vec::new();
    substitute(&mut value, "", &resolved, &mut unresolved);
    for missing in &unresolved {
        if missing.path == "endpoint" || missing.path == "cf-endpoint" {
            return Err(SyncError::Lookup(EXPORT_NOT_FOUND.to_string()));
        }
        warn!(
            "unresolved stack reference left absent (path={}, export={})",
            missing.path, missing.export
        );
    }

    Ok(serde_json::from_value(value).map_err(ConfigError::from)?)
}

fn collect_references(value: &Value, names: &mut BTreeSet<String>) {
    match value {
        Value::String(text) => {
            for caps in REFERENCE.captures_iter(text) {
                names.insert(caps[1].to_string());
            }
        }
        Value::Array(items) => items
            .iter()
            .for_each(|item| collect_references(item, names)),
        Value::Object(map) => map
            .values()
            .for_each(|item| collect_references(item, names)),
        _ => {}
    }
}

fn substitute(
    value: &mut Value,
    path: &str,
    resolved: &BTreeMap<String, Option<String>>,
    unresolved: &mut Vec<Unresolved>,
) {
    match value {
        Value::String(text) => {
            if let Some(result) = interpolate(text, resolved) {
                *value = match result {
                    Ok(text) => Value::String(text),
                    Err(export) => {
                        unresolved.push(Unresolved {
                            path: path.to_string(),
                            export,
                        });
                        Value::Null
                    }
                };
            }
        }
        Value::Array(items) => {
            for (idx, item) in items.iter_mut().enumerate() {
                substitute(item, &format!("{path}[{idx}]"), resolved, unresolved);
            }
        }
        Value::Object(map) => {
            for (key, item) in map.iter_mut() {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                substitute(item, &child, resolved, unresolved);
            }
        }
        _ => {}
    }
}

/// Replace every token in `text`.
///
/// Returns `None` when the text has no tokens and `Err(export)` naming the
/// first export that did not resolve.
fn interpolate(
    text: &str,
    resolved: &BTreeMap<String, Option<String>>,
) -> Option<Result<String, String>> {
    if !REFERENCE.is_match(text) {
        return None;
    }
    let mut missing = None;
    let replaced = REFERENCE.replace_all(text, |caps: &Captures<'_>| {
        match resolved.get(&caps[1]).cloned().flatten() {
            Some(value) => value,
            None => {
                missing.get_or_insert_with(|| caps[1].to_string());
                String::new()
            }
        }
    });
    let replaced = replaced.into_owned();
    Some(match missing {
        Some(export) => Err(export),
        None => Ok(replaced),
    })
}
