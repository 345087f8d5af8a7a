use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::errors::{AppError, StorageError};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Result of asking storage for a one-shot upload URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUpload {
    pub path: String,
    pub token: String,
    pub signed_url: String,
}

/// Narrow view of the bucket the API writes images into.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn create_signed_upload(&self, path: &str) -> Result<SignedUpload, StorageError>;

    /// Public URL for an object path in the bucket
    fn public_url(&self, path: &str) -> String;

    /// Inverse of [`ObjectStorage::public_url`]; `None` for URLs outside the bucket
    fn object_path(&self, public_url: &str) -> Option<String>;

    async fn remove(&self, paths: Vec<String>) -> Result<(), StorageError>;
}

/// Object key for a new upload: `{project_id}/{millis}-{filename}` with whitespace runs dashed.
pub fn upload_path(project_id: &str, filename: &str, unix_millis: i64) -> Result<String, AppError> {
    let project_id = project_id.trim();
    let filename = filename.trim();

    if project_id.is_empty() || filename.is_empty() {
        return Err(AppError::ValidationError(
            "projectId and filename are required".to_string(),
        ));
    }

    let raw = format!("{}/{}-{}", project_id, unix_millis, filename);
    Ok(WHITESPACE_RUN.replace_all(&raw, "-").into_owned())
}
