//! Loading of resource bodies from disk.

use crate::SyncError;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Loads the JSON body referenced by a resource entry.
#[async_trait]
pub trait BodyLoader: Send + Sync {
    async fn load(&self, file: &str) -> Result<Value, SyncError>;
}

/// Reads bodies from the filesystem, resolving relative paths against a root.
#[derive(Debug, Clone)]
pub struct FsBodyLoader {
    root: PathBuf,
}

impl FsBodyLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl BodyLoader for FsBodyLoader {
    async fn load(&self, file: &str) -> Result<Value, SyncError> {
        let path = self.root.join(file);
        debug!("loading resource body (path={})", path.display());
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| SyncError::Load {
                path: path.clone(),
                message: err.to_string(),
            })?;
        serde_json::from_str(&contents).map_err(|err| SyncError::Load {
            path,
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BodyLoader, FsBodyLoader};
    use crate::SyncError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn loads_relative_path_from_root() {
        let temp = tempdir().expect("tempdir");
        std::fs::create_dir_all(temp.path().join("mappings")).expect("dir");
        std::fs::write(
            temp.path().join("mappings/orders.json"),
            r#"{ "mappings": { "properties": {} } }"#,
        )
        .expect("write");
        let loader = FsBodyLoader::new(temp.path());
        let body = loader.load("mappings/orders.json").await.expect("load");
        assert_eq!(body, json!({ "mappings": { "properties": {} } }));
    }

    #[tokio::test]
    async fn invalid_json_is_load_error() {
        let temp = tempdir().expect("tempdir");
        std::fs::write(temp.path().join("broken.json"), "{ nope").expect("write");
        let loader = FsBodyLoader::new(temp.path());
        let err = loader.load("broken.json").await.expect_err("parse");
        let SyncError::Load { path, .. } = err else {
            panic!("expected load error");
        };
        assert_eq!(path, temp.path().join("broken.json"));
    }

    #[tokio::test]
    async fn missing_file_is_load_error() {
        let temp = tempdir().expect("tempdir");
        let loader = FsBodyLoader::new(temp.path());
        let err = loader.load("missing.json").await.expect_err("missing");
        assert!(err.to_string().starts_with("failed to load"));
    }
}
