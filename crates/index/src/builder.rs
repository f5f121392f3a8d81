//! Builds a [`SegmentIndex`] from a segment's document sources.

use crate::chunker::{Chunk, TextChunker};
use crate::embedder::Embedder;
use crate::segment::SegmentIndex;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};
use voibot_core::document::{DocumentFetcher, DocumentParser, PageText};
use voibot_core::error::IngestError;

/// The fetch → parse → chunk → embed pipeline for one segment.
pub struct IndexBuilder {
    fetcher: Arc<dyn DocumentFetcher>,
    parser: Arc<dyn DocumentParser>,
    chunker: TextChunker,
    embedder: Embedder,
}

impl IndexBuilder {
    pub fn new(
        fetcher: Arc<dyn DocumentFetcher>,
        parser: Arc<dyn DocumentParser>,
        chunker: TextChunker,
        embedder: Embedder,
    ) -> Self {
        Self {
            fetcher,
            parser,
            chunker,
            embedder,
        }
    }

    /// Build the index for `segment`.
    ///
    /// Documents are fetched concurrently. Any fetch, parse or embedding
    /// failure fails the whole segment. Chunks keep the order of `sources`.
    pub async fn build(&self, segment: &str, sources: &[String]) -> Result<SegmentIndex, IngestError> {
        if sources.is_empty() {
            return Err(IngestError::EmptySegment(segment.to_string()));
        }

        let documents = try_join_all(sources.iter().map(|url| self.load(url))).await?;

        let mut chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|pages| self.chunker.split(pages))
            .collect();
        for (i, chunk) in chunks.iter_mut().enumerate() {
            chunk.index = i;
        }
        if chunks.is_empty() {
            return Err(IngestError::EmptySegment(segment.to_string()));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self
            .embedder
            .embed_texts(&texts)
            .await
            .map_err(|e| IngestError::Embedding(e.to_string()))?;

        info!(
            segment = %segment,
            documents = sources.len(),
            chunks = chunks.len(),
            "Segment index built"
        );
        Ok(SegmentIndex::new(segment, chunks, embeddings))
    }

    /// Embed a query with the same model the segments were built with.
    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    async fn load(&self, url: &str) -> Result<Vec<PageText>, IngestError> {
        let bytes = self.fetcher.fetch(url).await?;
        debug!(url = %url, bytes = bytes.len(), fetcher = self.fetcher.name(), "Fetched document");
        self.parser.parse(url, &bytes)
    }
}
