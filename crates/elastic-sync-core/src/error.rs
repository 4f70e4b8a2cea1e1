//! Error types for resolution and synchronization.

use elastic_sync_config::ConfigError;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Remote error code for an index that already exists.
pub const ALREADY_EXISTS_ERROR: &str = "resource_already_exists_exception";

/// Errors returned by the resolve and apply phases.
///
/// `Configuration`, `Lookup`, `Validation` and `Remote` display their bare
/// message so the host can surface it verbatim.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No endpoint could be determined.
    #[error("{0}")]
    Configuration(String),
    /// A stack export was expected but missing, or the lookup failed.
    #[error("{0}")]
    Lookup(String),
    /// A resource entry lacks a required field.
    #[error("{0}")]
    Validation(String),
    /// A PUT against the cluster failed.
    #[error("{0}")]
    Remote(RemoteFailure),
    /// A resource body could not be read or parsed.
    #[error("failed to load {}: {message}", .path.display())]
    Load { path: PathBuf, message: String },
    /// Signing was requested but could not be performed.
    #[error("signing error: {0}")]
    Signing(String),
    /// Config decoding failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<RemoteFailure> for SyncError {
    fn from(failure: RemoteFailure) -> Self {
        SyncError::Remote(failure)
    }
}

/// Structured cause of a failed PUT.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RemoteFailure {
    /// Target URL of the request.
    pub url: String,
    /// HTTP status, absent for transport failures.
    pub status: Option<u16>,
    /// Human-readable message.
    pub message: String,
    /// Response body, parsed as JSON when possible.
    pub cause: Value,
}

impl RemoteFailure {
    /// Failure that never produced an HTTP response.
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: None,
            message: message.into(),
            cause: Value::Null,
        }
    }

    /// Failure built from a non-success response and its body.
    pub fn from_response(url: impl Into<String>, status: u16, body: &str) -> Self {
        let cause = serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));
        let reason = cause
            .pointer("/error/reason")
            .and_then(Value::as_str)
            .or_else(|| cause.pointer("/error/type").and_then(Value::as_str));
        let message = match reason {
            Some(reason) => format!("request failed with status {status}: {reason}"),
            None => format!("request failed with status {status}"),
        };
        Self {
            url: url.into(),
            status: Some(status),
            message,
            cause,
        }
    }

    /// Remote error code at `cause.error.type`.
    pub fn error_type(&self) -> Option<&str> {
        self.cause.pointer("/error/type").and_then(Value::as_str)
    }

    pub fn is_already_exists(&self) -> bool {
        self.error_type() == Some(ALREADY_EXISTS_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::{RemoteFailure, SyncError};
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_error_type_from_response_body() {
        let body = r#"{"error":{"type":"resource_already_exists_exception","reason":"index [orders/abc] already exists"},"status":400}"#;
        let failure = RemoteFailure::from_response("https://es/orders", 400, body);
        assert_eq!(failure.error_type(), Some("resource_already_exists_exception"));
        assert!(failure.is_already_exists());
        assert_eq!(
            failure.message,
            "request failed with status 400: index [orders/abc] already exists"
        );
    }

    #[test]
    fn keeps_non_json_body_as_string_cause() {
        let failure = RemoteFailure::from_response("https://es/orders", 502, "Bad Gateway");
        assert_eq!(failure.error_type(), None);
        assert_eq!(failure.cause, serde_json::json!("Bad Gateway"));
        assert_eq!(failure.message, "request failed with status 502");
    }

    #[test]
    fn remote_error_displays_message_verbatim() {
        let err = SyncError::from(RemoteFailure::transport("https://es/a", "connection refused"));
        assert_eq!(err.to_string(), "connection refused");
    }
}
