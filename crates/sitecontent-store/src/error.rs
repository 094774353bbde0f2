use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("remote store error: {0}")]
    Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// A failed read, as seen by every caller waiting on it.
#[derive(Debug, Clone, Error)]
#[error("fetch of {path} failed: {source}")]
pub struct FetchError {
    pub path: String,
    pub source: Arc<StoreError>,
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("not authorized to edit content")]
    Unauthorized,

    #[error("{path} failed validation: {}", .fields.join(", "))]
    Invalid { path: String, fields: Vec<String> },

    #[error("path is outside siteContent/: {0}")]
    OutsideNamespace(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
