//! Intent classification via a single model call.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;
use voibot_core::error::{Error, Result};
use voibot_core::provider::{Provider, ProviderRequest};

use crate::prompts;

/// Maps a query to one intent label.
///
/// The label comes straight from the model with surrounding whitespace
/// removed; it is *not* checked against the vocabulary here. The resolver
/// treats anything outside the vocabulary as an unknown intent.
pub struct IntentClassifier {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
}

impl IntentClassifier {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
        }
    }

    /// Classify `query`. Provider failures become [`Error::Classification`]
    /// and are not retried.
    pub async fn classify(&self, query: &str, role: &str, intents: &BTreeSet<String>) -> Result<String> {
        let request = ProviderRequest::new(
            &self.model,
            prompts::classification(query, role, intents),
            self.temperature,
        );

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(Error::Classification)?;

        let label = response.message.content.trim().to_string();
        debug!(intent = %label, "Query classified");
        Ok(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::SequentialMockProvider;
    use voibot_core::error::ProviderError;

    fn intents() -> BTreeSet<String> {
        ["greeting", "refund"].iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn returns_trimmed_label_at_configured_temperature() {
        let provider = Arc::new(SequentialMockProvider::texts(&["  refund\n"]));
        let classifier = IntentClassifier::new(provider.clone(), "mock-model", 0.5);

        let label = classifier
            .classify("I want my money back", "a support agent", &intents())
            .await
            .unwrap();

        assert_eq!(label, "refund");
        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert!((requests[0].temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(requests[0].model, "mock-model");
    }

    #[tokio::test]
    async fn label_outside_vocabulary_is_passed_through() {
        let provider = Arc::new(SequentialMockProvider::texts(&["weather"]));
        let classifier = IntentClassifier::new(provider, "mock-model", 0.5);
        let label = classifier.classify("is it sunny?", "a support agent", &intents()).await.unwrap();
        assert_eq!(label, "weather");
    }

    #[tokio::test]
    async fn provider_failure_is_classification_error() {
        let provider = Arc::new(SequentialMockProvider::new(vec![Err(ProviderError::Timeout(
            "30s".into(),
        ))]));
        let classifier = IntentClassifier::new(provider.clone(), "mock-model", 0.5);

        let err = classifier.classify("hi", "a support agent", &intents()).await.unwrap_err();

        assert!(matches!(err, Error::Classification(ProviderError::Timeout(_))));
        assert_eq!(provider.call_count(), 1);
    }
}
