//! RAG — Retrieval-Augmented Generation over one segment index.
//!
//! # Flow
//!
//! 1. If there is history, rewrite the question into a standalone one
//! 2. Embed the question and retrieve the closest chunks from the segment
//! 3. Generate an answer grounded in the chunks, with the history attached
//! 4. Return the answer with the sources it was grounded on

use std::sync::Arc;
use tracing::{debug, info};
use voibot_core::conversation::Turn;
use voibot_core::error::Result;
use voibot_core::provider::{Provider, ProviderRequest};
use voibot_index::{Embedder, SegmentIndex};

use crate::prompts;

/// Answers questions from a segment index.
pub struct RagGenerator {
    /// LLM provider.
    provider: Arc<dyn Provider>,
    /// Query embedder; must use the model the indices were built with.
    embedder: Embedder,
    /// Model name.
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    /// Chunks retrieved per question.
    top_k: usize,
    condense_questions: bool,
}

/// Result of a RAG execution.
#[derive(Debug, Clone)]
pub struct RagAnswer {
    /// The generated answer.
    pub answer: String,
    /// The question used for retrieval, after condensation.
    pub question: String,
    /// `source#page` of each retrieved chunk, best first.
    pub sources: Vec<String>,
}

impl RagGenerator {
    pub fn new(provider: Arc<dyn Provider>, embedder: Embedder, model: impl Into<String>) -> Self {
        Self {
            provider,
            embedder,
            model: model.into(),
            temperature: 0.9,
            max_tokens: None,
            top_k: 4,
            condense_questions: true,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Enable or disable rewriting follow-up questions before retrieval.
    pub fn with_condensing(mut self, enabled: bool) -> Self {
        self.condense_questions = enabled;
        self
    }

    /// Answer `question` from `index`, taking `history` into account.
    pub async fn run(&self, index: &SegmentIndex, question: &str, history: &[Turn]) -> Result<RagAnswer> {
        info!(segment = %index.name(), model = %self.model, "RAG: starting retrieval");

        let question = if self.condense_questions && !history.is_empty() {
            let standalone = self.complete(prompts::condense_question(history, question)).await?;
            debug!(standalone = %standalone, "RAG: condensed follow-up question");
            standalone
        } else {
            question.to_string()
        };

        let query_embedding = self.embedder.embed_query(&question).await?;
        let hits = index.search(&query_embedding, self.top_k);
        debug!(chunks = hits.len(), "RAG: chunks retrieved");

        let answer = self
            .complete(prompts::grounded_answer(&hits, history, &question))
            .await?;

        info!(
            chunks = hits.len(),
            answer_len = answer.len(),
            "RAG: response generated"
        );

        Ok(RagAnswer {
            answer,
            sources: hits
                .iter()
                .map(|hit| format!("{}#{}", hit.chunk.source, hit.chunk.page))
                .collect(),
            question,
        })
    }

    async fn complete(&self, messages: Vec<voibot_core::message::Message>) -> Result<String> {
        let mut request = ProviderRequest::new(&self.model, messages, self.temperature);
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        let response = self.provider.complete(request).await?;
        Ok(response.message.content.trim().to_string())
    }
}
