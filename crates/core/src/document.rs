//! Document ingestion traits — how source documents become page text.
//!
//! A segment's sources are fetched into raw bytes by a [`DocumentFetcher`],
//! then turned into page texts by a [`DocumentParser`]. Chunking and
//! embedding happen downstream in the index crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::IngestError;

/// The text of one page of a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// Where the page came from (the source URL or path).
    pub source: String,

    /// 1-based page number within the source.
    pub page: usize,

    pub text: String,
}

/// Fetches a source document's raw bytes.
///
/// Implementations: HTTP(S) via reqwest, local files, composite dispatch.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch the document at `url`. Fails with [`IngestError::Fetch`].
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, IngestError>;
}

/// Parses raw document bytes into page texts.
pub trait DocumentParser: Send + Sync {
    /// Parse `bytes` fetched from `source`. Fails with [`IngestError::Parse`].
    fn parse(&self, source: &str, bytes: &[u8]) -> std::result::Result<Vec<PageText>, IngestError>;
}
