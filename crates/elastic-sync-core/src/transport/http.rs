//! `reqwest`-backed transport.

use super::{PutRequest, Transport};
use crate::signer::SignedRequestParams;
use crate::{RemoteFailure, SyncError};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::sync::Arc;

/// Hook that signs an outgoing request with provider credentials.
#[async_trait]
pub trait RequestSigning: Send + Sync {
    async fn sign(
        &self,
        request: &mut reqwest::Request,
        params: &SignedRequestParams,
    ) -> Result<(), SyncError>;
}

/// Transport issuing real HTTP requests.
///
/// Requests that carry signing parameters require a [`RequestSigning`] hook;
/// without one they fail before anything is sent.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    signer: Option<Arc<dyn RequestSigning>>,
}

impl ReqwestTransport {
    /// Create a transport with a default client.
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a transport from a preconfigured client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            signer: None,
        }
    }

    /// Install the signing hook used for signed requests.
    pub fn with_signer(mut self, signer: Arc<dyn RequestSigning>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Whether a signing hook is installed.
    pub fn can_sign(&self) -> bool {
        self.signer.is_some()
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn put(&self, url: &str, request: PutRequest) -> Result<(), SyncError> {
        let mut builder = self.client.put(url).body(request.body.to_string());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut http_request = builder
            .build()
            .map_err(|err| RemoteFailure::transport(url, err.to_string()))?;

        if let Some(params) = &request.auth {
            let signer = self.signer.as_ref().ok_or_else(|| {
                SyncError::Signing(format!(
                    "request to {url} requires signing but no signer is installed"
                ))
            })?;
            signer.sign(&mut http_request, params).await?;
        }

        debug!("PUT {url}");
        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|err| RemoteFailure::transport(url, err.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let failure = match response.text().await {
            Ok(body) => RemoteFailure::from_response(url, status.as_u16(), &body),
            Err(err) => RemoteFailure {
                status: Some(status.as_u16()),
                ..RemoteFailure::transport(
                    url,
                    format!("HTTP {status}; failed to read response body: {err}"),
                )
            },
        };
        warn!(
            "PUT failed (url={url}, status={}, type={:?})",
            status.as_u16(),
            failure.error_type()
        );
        Err(failure.into())
    }
}
