//! Document ingestion and per-segment vector indices for Voibot.
//!
//! A segment's sources flow through the pipeline
//! fetch → parse → chunk → embed, producing one [`SegmentIndex`] per
//! segment. The [`DocumentIndexStore`] owns the built indices and answers
//! read-only lookups for RAG replies.

pub mod builder;
pub mod chunker;
pub mod embedder;
pub mod fetcher;
pub mod parser;
pub mod segment;
pub mod store;
pub mod vector;

pub use builder::IndexBuilder;
pub use chunker::{Chunk, TextChunker};
pub use embedder::Embedder;
pub use fetcher::{FileFetcher, HttpFetcher, SourceFetcher};
pub use parser::{AutoParser, PdfParser, PlainTextParser};
pub use segment::{ScoredChunk, SegmentIndex};
pub use store::{DocumentIndexStore, InitReport, SegmentFailure};
pub use vector::cosine_similarity;
