//! SigV4 request signing for managed search domains.

use super::RequestSigning;
use crate::SyncError;
use crate::signer::SignedRequestParams;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningSettings, sign};
use aws_sigv4::sign::v4;
use log::debug;
use parking_lot::Mutex;
use reqwest::header::{HeaderName, HeaderValue};
use std::collections::HashMap;
use std::time::SystemTime;

/// Signing name of the managed search service.
pub const SEARCH_SERVICE: &str = "es";

/// Signs requests with SigV4 using credentials of the named profile.
///
/// Credential providers are built once per profile and reused, so cached
/// credentials are refreshed by the provider itself.
pub struct SigV4Signer {
    service: String,
    fixed: Option<SharedCredentialsProvider>,
    providers: Mutex<HashMap<String, SharedCredentialsProvider>>,
}

impl SigV4Signer {
    /// Signer resolving credentials through the default provider chain.
    pub fn new() -> Self {
        Self {
            service: SEARCH_SERVICE.to_string(),
            fixed: None,
            providers: Mutex::new(HashMap::new()),
        }
    }

    /// Signer using fixed credentials regardless of profile.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            fixed: Some(SharedCredentialsProvider::new(credentials)),
            ..Self::new()
        }
    }

    /// Override the service signing name.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    async fn provider(
        &self,
        params: &SignedRequestParams,
    ) -> Result<SharedCredentialsProvider, SyncError> {
        if let Some(fixed) = &self.fixed {
            return Ok(fixed.clone());
        }
        if let Some(cached) = self.providers.lock().get(&params.profile) {
            return Ok(cached.clone());
        }

        debug!("loading credential provider (profile={})", params.profile);
        let config = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(&params.profile)
            .region(Region::new(params.region.clone()))
            .load()
            .await;
        let provider = config.credentials_provider().ok_or_else(|| {
            SyncError::Signing(format!(
                "no credential provider for profile {}",
                params.profile
            ))
        })?;
        self.providers
            .lock()
            .insert(params.profile.clone(), provider.clone());
        Ok(provider)
    }
}

impl Default for SigV4Signer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestSigning for SigV4Signer {
    async fn sign(
        &self,
        request: &mut reqwest::Request,
        params: &SignedRequestParams,
    ) -> Result<(), SyncError> {
        let credentials = self
            .provider(params)
            .await?
            .provide_credentials()
            .await
            .map_err(|err| SyncError::Signing(format!("failed to load credentials: {err}")))?;
        let identity = credentials.into();
        let signing_params = v4::SigningParams::builder()
            .identity(&identity)
            .region(&params.region)
            .name(&self.service)
            .time(SystemTime::now())
            .settings(SigningSettings::default())
            .build()
            .map_err(|err| SyncError::Signing(err.to_string()))?
            .into();

        let headers: Vec<(&str, &str)> = request
            .headers()
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|value| (name.as_str(), value)))
            .collect();
        let body = request.body().and_then(|body| body.as_bytes()).unwrap_or(&[]);
        let signable = SignableRequest::new(
            request.method().as_str(),
            request.url().as_str(),
            headers.into_iter(),
            SignableBody::Bytes(body),
        )
        .map_err(|err| SyncError::Signing(err.to_string()))?;

        let (instructions, _signature) = sign(signable, &signing_params)
            .map_err(|err| SyncError::Signing(err.to_string()))?
            .into_parts();

        let mut signed = Vec::new();
        for (name, value) in instructions.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| SyncError::Signing(err.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|err| SyncError::Signing(err.to_string()))?;
            signed.push((name, value));
        }
        for (name, value) in signed {
            request.headers_mut().insert(name, value);
        }
        debug!(
            "request signed (url={}, region={})",
            request.url(),
            params.region
        );
        Ok(())
    }
}
