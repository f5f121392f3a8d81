//! Sliding-window text chunker.
//!
//! Each page is cut into windows of `chunk_size` characters, each window
//! starting `chunk_size - overlap` characters after the previous one. Windows
//! never span pages. Sizes are counted in `char`s, not bytes, so multi-byte
//! text is never split inside a code point.

use serde::{Deserialize, Serialize};
use voibot_core::document::PageText;

/// One indexed unit of text with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub source: String,
    pub page: usize,
    /// Position of this chunk within its segment.
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy)]
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
}

impl TextChunker {
    /// Panics if `overlap >= chunk_size`; configuration validation rejects
    /// that combination before a chunker is built.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        assert!(overlap < chunk_size, "chunk overlap must be smaller than chunk size");
        Self { chunk_size, overlap }
    }

    /// Split pages into chunks, numbering them from 0 in page order.
    pub fn split(&self, pages: &[PageText]) -> Vec<Chunk> {
        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();

        for page in pages {
            let chars: Vec<char> = page.text.chars().collect();
            let mut start = 0;
            while start < chars.len() {
                let end = (start + self.chunk_size).min(chars.len());
                let text: String = chars[start..end].iter().collect();
                if !text.trim().is_empty() {
                    chunks.push(Chunk {
                        source: page.source.clone(),
                        page: page.page,
                        index: chunks.len(),
                        text,
                    });
                }
                if end == chars.len() {
                    break;
                }
                start += step;
            }
        }

        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}
