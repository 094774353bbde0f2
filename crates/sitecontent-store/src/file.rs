//! Document tree persisted as a single JSON file.
//!
//! Used for offline work against an export of the remote store and for
//! staging seed data before pushing it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::{DocumentClient, MemoryDocumentClient, StoreError};

pub struct JsonFileClient {
    path: PathBuf,
    tree: MemoryDocumentClient,
}

impl JsonFileClient {
    /// Load an existing JSON export.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(StoreError::FileNotFound(path.to_path_buf()));
        }
        let bytes = tokio::fs::read(path).await?;
        let root: Value = serde_json::from_slice(&bytes)?;
        info!(path = %path.display(), "opened document file");
        Ok(Self {
            path: path.to_path_buf(),
            tree: MemoryDocumentClient::with_root(root),
        })
    }

    /// Start an empty tree that will be written to `path` on the first `set`.
    pub fn create(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            tree: MemoryDocumentClient::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&self.tree.snapshot())?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentClient for JsonFileClient {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.tree.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.tree.set(path, value).await?;
        self.persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileClient::open(&dir.path().join("nope.json"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn set_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");

        let client = JsonFileClient::create(&path);
        client
            .set("siteContent/heroes/home", json!({ "headline": "Learn with us" }))
            .await
            .unwrap();

        let reopened = JsonFileClient::open(&path).await.unwrap();
        let hero = reopened.get("siteContent/heroes/home").await.unwrap().unwrap();
        assert_eq!(hero["headline"], "Learn with us");
    }

    #[tokio::test]
    async fn open_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, b"{ not json").unwrap();
        let err = JsonFileClient::open(&path).await.err().unwrap();
        assert!(matches!(err, StoreError::Json(_)));
    }
}
