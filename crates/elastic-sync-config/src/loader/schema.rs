//! Schema validation helpers for JSON5 sync configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Keys with a fixed shape; any other top-level key may hold any value.
const STRING_KEYS: &[&str] = &["endpoint", "cf-endpoint"];
const RESOURCE_KEYS: &[&str] = &["indices", "templates"];

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;

    for (key, value) in map {
        if STRING_KEYS.contains(&key.as_str()) {
            expect_optional_string(value, layer, key)?;
        } else if RESOURCE_KEYS.contains(&key.as_str()) {
            validate_resource_refs(value, layer, key)?;
        } else if key == "repositories" {
            expect_array(value, layer, key)?;
        }
    }

    Ok(())
}

/// Validate a list of `{ name, file }` references.
fn validate_resource_refs(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let arr = expect_array(value, layer, path)?;
    for (idx, entry) in arr.iter().enumerate() {
        let entry_path = format!("{path}[{idx}]");
        let map = expect_object(entry, layer, &entry_path)?;
        ensure_allowed_keys(map, &["name", "file"], layer, &entry_path)?;
        if let Some(value) = map.get("name") {
            expect_optional_string(value, layer, &join_path(&entry_path, "name"))?;
        }
        if let Some(value) = map.get("file") {
            expect_optional_string(value, layer, &join_path(&entry_path, "file"))?;
        }
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON array or return a typed error.
fn expect_array<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Vec<Value>, ConfigError> {
    match value {
        Value::Array(arr) => Ok(arr),
        _ => Err(invalid_field(layer, path, "expected array")),
    }
}

/// Expect a JSON string (or null) or return a typed error.
fn expect_optional_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() || value.is_null() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
