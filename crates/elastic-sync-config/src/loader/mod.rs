//! JSON5 config loader with layered overrides.
//!
//! Reads one or more config files, validates each layer against the schema,
//! merges them in order and produces the final `SyncConfig`.

mod merge;
mod schema;


use crate::{ConfigError, ResourceRef, SyncConfig};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

impl SyncConfig {
    /// Load a single config from a path (no layering).
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        info!("loading config from path: {}", path.as_ref().display());
        let contents = fs::read_to_string(path)?;
        let value: Value = json5::from_str(&contents)?;
        config_from_value(value, "config")
    }

    /// Load a single config from JSON5 contents (no layering).
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let value: Value = json5::from_str(contents)?;
        config_from_value(value, "config")
    }

    /// Load a stack of config files, later files overriding earlier ones.
    ///
    /// Objects merge key by key; arrays and scalars are replaced wholesale.
    pub fn load_layered(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        if paths.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one config path is required".to_string(),
            ));
        }
        let mut merged = Value::Object(serde_json::Map::new());
        for path in paths {
            let layer = load_layer(path)?;
            merge::merge_json_values(&mut merged, &layer);
        }
        let config = config_from_value(merged, "effective")?;
        info!("layered config loaded (layers={})", paths.len());
        Ok(config)
    }

    /// Validate invariants that cannot be expressed in serde.
    ///
    /// Concurrent puts within a collection must target distinct URLs, so a
    /// resource name may appear at most once per collection.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unique_names(&self.indices, "indices")?;
        ensure_unique_names(&self.templates, "templates")?;
        Ok(())
    }
}

fn ensure_unique_names(refs: &[ResourceRef], collection: &str) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in refs.iter().filter_map(|entry| entry.name.as_deref()) {
        if !seen.insert(name) {
            return Err(ConfigError::Invalid(format!(
                "duplicate name in {collection}: {name}"
            )));
        }
    }
    Ok(())
}

/// Read and validate a single override layer.
fn load_layer(path: &Path) -> Result<Value, ConfigError> {
    debug!("loading config layer (path={})", path.display());
    let contents = fs::read_to_string(path)?;
    let value: Value = json5::from_str(&contents)?;
    let label = format!("layer({})", path.display());
    schema::validate_layer_schema(&value, &label)?;
    Ok(value)
}

fn config_from_value(value: Value, label: &str) -> Result<SyncConfig, ConfigError> {
    schema::validate_layer_schema(&value, label)?;
    let config: SyncConfig = serde_json::from_value(value)?;
    config.validate()?;
    Ok(config)
}
