use async_trait::async_trait;
use elastic_sync_core::{
    Endpoint, RepositorySetup, RequestOptions, SignedRequestParams, SyncError,
};
use parking_lot::Mutex;
use serde_json::Value;

/// Arguments of one repository setup call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRepositoryCall {
    pub base_url: Endpoint,
    pub credentials: Option<SignedRequestParams>,
    pub repos: Vec<Value>,
    pub options: RequestOptions,
}

/// Repository setup that only records its calls.
#[derive(Debug, Default)]
pub struct RecordingRepositories {
    calls: Mutex<Vec<RecordedRepositoryCall>>,
}

impl RecordingRepositories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedRepositoryCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl RepositorySetup for RecordingRepositories {
    async fn apply(
        &self,
        base_url: &Endpoint,
        credentials: Option<&SignedRequestParams>,
        repos: &[Value],
        options: &RequestOptions,
    ) -> Result<(), SyncError> {
        self.calls.lock().push(RecordedRepositoryCall {
            base_url: base_url.clone(),
            credentials: credentials.cloned(),
            repos: repos.to_vec(),
            options: options.clone(),
        });
        Ok(())
    }
}
