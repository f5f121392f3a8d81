//! A built, read-only index over one segment's chunks.

use crate::chunker::Chunk;
use crate::vector::rank_by_similarity;

/// A chunk returned by a search, with its cosine similarity to the query.
#[derive(Debug, Clone, Copy)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a Chunk,
    pub score: f32,
}

/// Embedded chunks of one segment. Immutable once built.
#[derive(Debug, Clone)]
pub struct SegmentIndex {
    name: String,
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
}

impl SegmentIndex {
    /// Pair chunks with their embeddings. Both must have the same length.
    pub fn new(name: impl Into<String>, chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>) -> Self {
        debug_assert_eq!(chunks.len(), embeddings.len());
        Self {
            name: name.into(),
            chunks,
            embeddings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The `top_k` chunks most similar to `query_embedding`, best first.
    pub fn search(&self, query_embedding: &[f32], top_k: usize) -> Vec<ScoredChunk<'_>> {
        rank_by_similarity(
            self.embeddings.iter().map(Vec::as_slice),
            query_embedding,
            top_k,
        )
        .into_iter()
        .map(|(i, score)| ScoredChunk {
            chunk: &self.chunks[i],
            score,
        })
        .collect()
    }
}
