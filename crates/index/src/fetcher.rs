//! Document fetchers.
//!
//! - [`HttpFetcher`] downloads `http://` and `https://` sources.
//! - [`FileFetcher`] reads `file://` URLs and plain local paths.
//! - [`SourceFetcher`] dispatches between the two by scheme.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use voibot_core::document::DocumentFetcher;
use voibot_core::error::IngestError;

/// Downloads documents over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to build HTTP client, falling back to defaults");
                reqwest::Client::new()
            });
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let fetch_error = |reason: String| IngestError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        debug!(url, bytes = bytes.len(), "Document downloaded");
        Ok(bytes.to_vec())
    }
}

/// Reads documents from the local filesystem.
pub struct FileFetcher;

#[async_trait]
impl DocumentFetcher for FileFetcher {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        let path = url.strip_prefix("file://").unwrap_or(url);
        tokio::fs::read(path).await.map_err(|e| IngestError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Routes each source to the fetcher for its scheme.
pub struct SourceFetcher {
    http: HttpFetcher,
    file: FileFetcher,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: HttpFetcher::new(timeout),
            file: FileFetcher,
        }
    }
}

fn is_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[async_trait]
impl DocumentFetcher for SourceFetcher {
    fn name(&self) -> &str {
        "source"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        if is_http(url) {
            self.http.fetch(url).await
        } else {
            self.file.fetch(url).await
        }
    }
}
