use async_trait::async_trait;
use elastic_sync_core::{PutRequest, RemoteFailure, SyncError, Transport};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;

/// A PUT observed by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPut {
    pub url: String,
    pub request: PutRequest,
}

/// Transport that records every PUT and replays scripted failures by URL.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    failures: HashMap<String, RemoteFailure>,
    calls: Mutex<Vec<RecordedPut>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail PUTs to `url` with the given remote error type.
    pub fn with_error_type(mut self, url: impl Into<String>, error_type: &str) -> Self {
        let url = url.into();
        let body = json!({
            "error": { "type": error_type, "reason": format!("{error_type} at {url}") },
            "status": 400,
        });
        let failure = RemoteFailure::from_response(url.clone(), 400, &body.to_string());
        self.failures.insert(url, failure);
        self
    }

    /// Fail PUTs to `url` without an HTTP response.
    pub fn with_transport_error(mut self, url: impl Into<String>, message: &str) -> Self {
        let url = url.into();
        self.failures
            .insert(url.clone(), RemoteFailure::transport(url, message));
        self
    }

    pub fn calls(&self) -> Vec<RecordedPut> {
        self.calls.lock().clone()
    }

    /// URLs put so far, sorted for order-independent assertions.
    pub fn urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.calls.lock().iter().map(|call| call.url.clone()).collect();
        urls.sort();
        urls
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn put(&self, url: &str, request: PutRequest) -> Result<(), SyncError> {
        self.calls.lock().push(RecordedPut {
            url: url.to_string(),
            request,
        });
        match self.failures.get(url) {
            Some(failure) => Err(failure.clone().into()),
            None => Ok(()),
        }
    }
}
