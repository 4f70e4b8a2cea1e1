use async_trait::async_trait;
use elastic_sync_core::{StackExports, SyncError};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Export table keyed by export name, recording every lookup.
#[derive(Debug, Default)]
pub struct StaticExports {
    values: HashMap<String, String>,
    failure: Option<String>,
    lookups: Mutex<Vec<(String, String)>>,
}

impl StaticExports {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_export(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Make every lookup fail as a transport error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// `(stack_id, export_name)` pairs looked up so far.
    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().clone()
    }
}

#[async_trait]
impl StackExports for StaticExports {
    async fn find_export(
        &self,
        stack_id: &str,
        export_name: &str,
    ) -> Result<Option<String>, SyncError> {
        self.lookups
            .lock()
            .push((stack_id.to_string(), export_name.to_string()));
        if let Some(message) = &self.failure {
            return Err(SyncError::Lookup(message.clone()));
        }
        Ok(self.values.get(export_name).cloned())
    }
}
