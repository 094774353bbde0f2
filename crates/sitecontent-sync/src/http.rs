//! REST client for the hosted key-path document store.
//!
//! Paths map to `{base_url}/{path}.json`; reads are `GET`, writes `PUT`.
//! The store answers `null` for paths that hold nothing.

use async_trait::async_trait;
use serde_json::Value;
use sitecontent_store::{DocumentClient, StoreError};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SyncError> for StoreError {
    fn from(e: SyncError) -> Self {
        StoreError::Remote(Box::new(e))
    }
}

/// HTTP client for the document store's REST endpoint.
pub struct RestDocumentClient {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
}

impl RestDocumentClient {
    /// `base_url` should be like `https://institute-site.example.com`
    /// (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: None,
        }
    }

    /// Send `auth=<token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        let mut url = format!("{}/{}.json", self.base_url, path.trim_matches('/'));
        if let Some(token) = &self.auth_token {
            url.push_str(&format!("?auth={token}"));
        }
        url
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, SyncError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    /// Read the value at `path`. `None` when the store holds nothing there.
    pub async fn get_value(&self, path: &str) -> Result<Option<Value>, SyncError> {
        info!(path = %path, "reading from document store");
        let resp = Self::check(self.client.get(self.url(path)).send().await?).await?;
        let body = resp.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        Ok((!value.is_null()).then_some(value))
    }

    /// Replace the value at `path`.
    pub async fn put_value(&self, path: &str, value: &Value) -> Result<(), SyncError> {
        info!(path = %path, "writing to document store");
        Self::check(self.client.put(self.url(path)).json(value).send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentClient for RestDocumentClient {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.get_value(path).await?)
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        Ok(self.put_value(path, &value).await?)
    }
}
