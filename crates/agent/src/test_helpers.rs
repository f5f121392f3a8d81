//! Shared test helpers for the agent crate.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use voibot_core::document::DocumentFetcher;
use voibot_core::error::{IngestError, ProviderError};
use voibot_core::message::Message;
use voibot_core::provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage,
};

/// Words whose counts make up a test embedding.
const KEYWORDS: [&str; 4] = ["refund", "ship", "bill", "hello"];

/// A mock provider that returns a sequence of scripted completions.
///
/// Each call to `complete` returns the next response in the queue and
/// records the request. Panics if more calls are made than responses
/// provided. Embeddings are keyword counts, so retrieval is deterministic.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A provider answering each completion with the given texts, in order.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Every completion request received so far.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn keyword_vector(text: &str) -> Vec<f32> {
    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .map(|k| lower.matches(k).count() as f32)
        .collect()
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let mut responses = self.responses.lock().unwrap();

        if responses.is_empty() {
            panic!(
                "SequentialMockProvider: no more responses (call #{})",
                requests.len()
            );
        }

        requests.push(request);
        let text = responses.remove(0)?;
        Ok(make_text_response(&text))
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        Ok(EmbeddingResponse {
            embeddings: request.inputs.iter().map(|t| keyword_vector(t)).collect(),
            model: request.model,
            usage: None,
        })
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// Serves documents from memory; unknown URLs fail to fetch.
#[derive(Default)]
pub struct MockFetcher {
    documents: HashMap<String, Vec<u8>>,
}

impl MockFetcher {
    pub fn with(mut self, url: &str, text: &str) -> Self {
        self.documents.insert(url.to_string(), text.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl DocumentFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| IngestError::Fetch {
                url: url.to_string(),
                reason: "HTTP 404".into(),
            })
    }
}
