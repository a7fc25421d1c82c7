//! Zotero Web API client.
//!
//! Covers the two calls this tool needs: enumerating every top-level item
//! in a library, and writing a batch of mutated items back.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::models::Item;

const ZOTERO_API_BASE: &str = "https://api.zotero.org";
const ZOTERO_API_VERSION: &str = "3";

/// Page size when listing items.
const PAGE_SIZE: usize = 100;

/// The Zotero write API accepts at most 50 items per request.
const WRITE_CHUNK_SIZE: usize = 50;

/// Client for one Zotero user or group library
#[derive(Debug, Clone)]
pub struct ZoteroClient {
    client: Arc<Client>,
    base_url: String,
    prefix: String,
    api_key: String,
}

impl ZoteroClient {
    /// Create a client for the library described by `config`
    pub fn new(config: &ConnectionConfig) -> Self {
        Self::with_base_url(config, ZOTERO_API_BASE)
    }

    /// Create a client against a custom endpoint (used by tests)
    pub fn with_base_url(config: &ConnectionConfig, base_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(
                Client::builder()
                    .user_agent(concat!(
                        env!("CARGO_PKG_NAME"),
                        "/",
                        env!("CARGO_PKG_VERSION")
                    ))
                    .timeout(Duration::from_secs(30))
                    .build()
                    .expect("Failed to create HTTP client"),
            ),
            base_url: base_url.into(),
            // "user" -> users/<id>, "group" -> groups/<id>
            prefix: format!("{}s/{}", config.library_type, config.library_id),
            api_key: config.api_key.clone(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(
                method,
                format!("{}/{}/{}", self.base_url, self.prefix, path),
            )
            .header("Zotero-API-Key", &self.api_key)
            .header("Zotero-API-Version", ZOTERO_API_VERSION)
    }

    /// Fetch every top-level item in the library, following pagination
    /// until a short page.
    pub async fn all_top(&self) -> Result<Vec<Item>, ZoteroError> {
        let mut items = Vec::new();
        let mut start = 0usize;

        loop {
            let response = self
                .request(reqwest::Method::GET, "items/top")
                .query(&[("start", start.to_string()), ("limit", PAGE_SIZE.to_string())])
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(ZoteroError::Api(format!(
                    "item listing returned status {}",
                    response.status()
                )));
            }

            let page: Vec<Item> = response
                .json()
                .await
                .map_err(|e| ZoteroError::Parse(e.to_string()))?;

            let page_len = page.len();
            debug!(start, count = page_len, "fetched item page");
            items.extend(page);

            if page_len < PAGE_SIZE {
                break;
            }
            start += PAGE_SIZE;
        }

        Ok(items)
    }

    /// Write mutated items back in one logical bulk submission, split
    /// only where the API's per-request cap requires it.
    pub async fn update_items(&self, items: &[Item]) -> Result<(), ZoteroError> {
        for chunk in items.chunks(WRITE_CHUNK_SIZE) {
            let response = self
                .request(reqwest::Method::POST, "items")
                .json(chunk)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(ZoteroError::Api(format!(
                    "bulk update returned status {}",
                    response.status()
                )));
            }

            debug!(count = chunk.len(), "submitted update chunk");
        }

        Ok(())
    }
}

/// Errors from the Zotero Web API
#[derive(Debug, thiserror::Error)]
pub enum ZoteroError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Non-success status from the API
    #[error("Zotero API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for ZoteroError {
    fn from(err: reqwest::Error) -> Self {
        ZoteroError::Network(err.to_string())
    }
}
