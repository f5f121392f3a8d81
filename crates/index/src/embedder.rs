//! Batched access to the provider's embedding endpoint.

use std::sync::Arc;
use tracing::debug;
use voibot_core::error::ProviderError;
use voibot_core::provider::{EmbeddingRequest, Provider};

/// Turns texts into vectors, `batch_size` texts per request.
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn Provider>,
    model: String,
    batch_size: usize,
}

impl Embedder {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, batch_size: usize) -> Self {
        Self {
            provider,
            model: model.into(),
            batch_size: batch_size.max(1),
        }
    }

    /// Embed every text, preserving input order.
    pub async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let response = self
                .provider
                .embed(EmbeddingRequest {
                    model: self.model.clone(),
                    inputs: batch.to_vec(),
                })
                .await?;

            if response.embeddings.len() != batch.len() {
                return Err(ProviderError::ApiError {
                    status_code: 200,
                    message: format!(
                        "expected {} embeddings, got {}",
                        batch.len(),
                        response.embeddings.len()
                    ),
                });
            }
            debug!(batch = batch.len(), "Embedded batch");
            vectors.extend(response.embeddings);
        }
        Ok(vectors)
    }

    /// Embed a single query.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut vectors = self.embed_texts(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| ProviderError::ApiError {
            status_code: 200,
            message: "empty embedding response".into(),
        })
    }
}
