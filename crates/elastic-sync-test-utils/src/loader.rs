use async_trait::async_trait;
use elastic_sync_core::{BodyLoader, SyncError};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Bodies served from memory, keyed by file path.
#[derive(Debug, Default, Clone)]
pub struct StaticBodies {
    bodies: HashMap<String, Value>,
}

impl StaticBodies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, file: impl Into<String>, body: Value) -> Self {
        self.bodies.insert(file.into(), body);
        self
    }
}

#[async_trait]
impl BodyLoader for StaticBodies {
    async fn load(&self, file: &str) -> Result<Value, SyncError> {
        self.bodies.get(file).cloned().ok_or_else(|| SyncError::Load {
            path: PathBuf::from(file),
            message: "no such body".to_string(),
        })
    }
}
