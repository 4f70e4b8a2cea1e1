//! Stack export lookup.

use crate::SyncError;
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Source of the outputs published by a deployed infrastructure stack.
#[async_trait]
pub trait StackExports: Send + Sync {
    /// Look up a single export of a stack.
    ///
    /// Returns `Ok(None)` when the export does not exist. Transport failures
    /// are errors.
    async fn find_export(
        &self,
        stack_id: &str,
        export_name: &str,
    ) -> Result<Option<String>, SyncError>;
}

/// Resolve one export with exactly one lookup and no retries.
pub async fn resolve_export(
    exports: &dyn StackExports,
    stack_id: &str,
    export_name: &str,
) -> Result<Option<String>, SyncError> {
    debug!("resolving stack export (stack={stack_id}, export={export_name})");
    let value = exports.find_export(stack_id, export_name).await?;
    if value.is_none() {
        debug!("stack export absent (stack={stack_id}, export={export_name})");
    }
    Ok(value)
}

/// Export source for hosts without a deployed stack; every export is absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStackExports;

#[async_trait]
impl StackExports for NoStackExports {
    async fn find_export(
        &self,
        stack_id: &str,
        export_name: &str,
    ) -> Result<Option<String>, SyncError> {
        debug!("no stack outputs configured (stack={stack_id}, export={export_name})");
        Ok(None)
    }
}

/// Stack outputs read from a `describe-stacks` JSON document on disk.
///
/// The document has the shape
/// `{ "Stacks": [ { "StackName", "Outputs": [ { "OutputKey", "OutputValue", "ExportName" } ] } ] }`.
#[derive(Debug, Clone)]
pub struct StackOutputsFile {
    path: PathBuf,
}

impl StackOutputsFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn read(&self) -> Result<DescribeStacks, SyncError> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| {
                SyncError::Lookup(format!(
                    "failed to read stack outputs {}: {err}",
                    self.path.display()
                ))
            })?;
        serde_json::from_str(&contents).map_err(|err| {
            SyncError::Lookup(format!(
                "failed to parse stack outputs {}: {err}",
                self.path.display()
            ))
        })
    }
}

#[async_trait]
impl StackExports for StackOutputsFile {
    async fn find_export(
        &self,
        stack_id: &str,
        export_name: &str,
    ) -> Result<Option<String>, SyncError> {
        let document = self.read().await?;
        let stack = document
            .stacks
            .into_iter()
            .find(|stack| stack.stack_name == stack_id)
            .ok_or_else(|| {
                SyncError::Lookup(format!(
                    "stack {stack_id} is not described in {}",
                    self.path.display()
                ))
            })?;
        let value = stack
            .outputs
            .into_iter()
            .find(|output| output.export_name.as_deref() == Some(export_name))
            .and_then(|output| output.output_value);
        if value.is_some() {
            info!("stack export found (stack={stack_id}, export={export_name})");
        }
        Ok(value)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStacks {
    #[serde(default)]
    stacks: Vec<StackDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackDescription {
    stack_name: String,
    #[serde(default)]
    outputs: Vec<StackOutput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StackOutput {
    #[serde(default)]
    output_value: Option<String>,
    #[serde(default)]
    export_name: Option<String>,
}
