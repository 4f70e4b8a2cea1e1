//! Request signing parameters derived from the target provider.

use crate::resolver::STACK_PROVIDER;
use elastic_sync_config::ProviderSettings;
use log::debug;

/// Region used when the provider does not name one.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Credential profile used when the provider does not name one.
pub const DEFAULT_PROFILE: &str = "default";

/// Credential profile and region to sign outbound requests with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequestParams {
    pub profile: String,
    pub region: String,
}

/// Per-request options threaded into every outbound call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Signing parameters, set only when the target requires signing.
    pub auth: Option<SignedRequestParams>,
}

impl RequestOptions {
    pub fn credentials(&self) -> Option<&SignedRequestParams> {
        self.auth.as_ref()
    }
}

/// Build request options for the target provider.
///
/// Stack-provider targets get signing parameters; anything else is sent
/// unsigned.
pub fn request_options(provider: &ProviderSettings) -> RequestOptions {
    if provider.name.as_deref() != Some(STACK_PROVIDER) {
        debug!("request signing disabled (provider={:?})", provider.name);
        return RequestOptions::default();
    }
    let auth = SignedRequestParams {
        profile: provider
            .profile
            .clone()
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
        region: provider
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
    };
    debug!(
        "request signing enabled (profile={}, region={})",
        auth.profile, auth.region
    );
    RequestOptions { auth: Some(auth) }
}

#[cfg(test)]
mod tests {
    use super::{RequestOptions, SignedRequestParams, request_options};
    use elastic_sync_config::ProviderSettings;
    use pretty_assertions::assert_eq;

    #[test]
    fn non_stack_provider_is_unsigned() {
        let provider = ProviderSettings {
            name: Some("local".to_string()),
            ..ProviderSettings::default()
        };
        assert_eq!(request_options(&provider), RequestOptions::default());
        assert_eq!(request_options(&ProviderSettings::default()).auth, None);
    }

    #[test]
    fn stack_provider_uses_profile_and_region() {
        let provider = ProviderSettings {
            name: Some("aws".to_string()),
            region: Some("eu-west-1".to_string()),
            profile: Some("deploy".to_string()),
        };
        assert_eq!(
            request_options(&provider).auth,
            Some(SignedRequestParams {
                profile: "deploy".to_string(),
                region: "eu-west-1".to_string(),
            })
        );
    }

    #[test]
    fn stack_provider_falls_back_to_defaults() {
        let provider = ProviderSettings {
            name: Some("aws".to_string()),
            ..ProviderSettings::default()
        };
        let options = request_options(&provider);
        let auth = options.credentials().expect("signed");
        assert_eq!(auth.profile, "default");
        assert_eq!(auth.region, "us-east-1");
    }
}
