//! HTTP PUT primitive used to apply resources.

mod http;
mod sigv4;

pub use http::{ReqwestTransport, RequestSigning};
pub use sigv4::{SEARCH_SERVICE, SigV4Signer};

use crate::SyncError;
use crate::signer::{RequestOptions, SignedRequestParams};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

/// Content type sent with every resource body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A single PUT to issue against the cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct PutRequest {
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    /// Signing parameters merged in from [`RequestOptions`].
    pub auth: Option<SignedRequestParams>,
}

impl PutRequest {
    /// JSON body request carrying the options' signing parameters.
    pub fn json(body: Value, options: &RequestOptions) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());
        Self {
            headers,
            body,
            auth: options.auth.clone(),
        }
    }
}

/// Transport that issues PUT requests.
///
/// Remote failures are reported as [`SyncError::Remote`] so callers can
/// classify them by `cause.error.type`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn put(&self, url: &str, request: PutRequest) -> Result<(), SyncError>;
}
