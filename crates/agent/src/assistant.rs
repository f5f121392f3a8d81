//! The assistant — owns every component and drives one conversation.
//!
//! `respond` follows a fixed pipeline:
//!
//! 1. **Classify** the query into an intent
//! 2. **Resolve** the intent into a reply (RAG, role reply, or template)
//! 3. **Record** the (query, reply) turn in memory
//! 4. **Return** the reply
//!
//! Taking `&mut self` serializes calls, so turns are recorded in the order
//! they were answered.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use voibot_config::AppConfig;
use voibot_core::document::{DocumentFetcher, DocumentParser};
use voibot_core::error::{Error, Result};
use voibot_core::provider::Provider;
use voibot_index::{
    AutoParser, DocumentIndexStore, Embedder, IndexBuilder, InitReport, SourceFetcher, TextChunker,
};
use voibot_memory::ConversationMemory;

use crate::classifier::IntentClassifier;
use crate::rag::RagGenerator;
use crate::resolver::{DontKnowResponses, ReplyResolver};

pub struct Assistant {
    role: String,
    intents: BTreeSet<String>,
    segments: BTreeMap<String, Vec<String>>,
    builder: IndexBuilder,
    store: DocumentIndexStore,
    memory: ConversationMemory,
    classifier: IntentClassifier,
    resolver: ReplyResolver,
}

impl Assistant {
    /// Build an assistant with the configured provider, fetching sources
    /// over HTTP or from disk.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = voibot_providers::build_from_config(config)?;
        let fetcher = Arc::new(SourceFetcher::new(Duration::from_secs(
            config.ingest.fetch_timeout_secs,
        )));
        Self::with_collaborators(config, provider, fetcher, Arc::new(AutoParser))
    }

    /// Build an assistant around explicit collaborators.
    ///
    /// Fails with [`Error::Config`] if `config` does not validate.
    pub fn with_collaborators(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        fetcher: Arc<dyn DocumentFetcher>,
        parser: Arc<dyn DocumentParser>,
    ) -> Result<Self> {
        config.validate().map_err(|e| Error::Config {
            message: e.to_string(),
        })?;

        let assistant = &config.assistant;
        let sampling = &config.sampling;

        let embedder = Embedder::new(
            provider.clone(),
            &config.embedding_model,
            config.ingest.embedding_batch_size,
        );
        let builder = IndexBuilder::new(
            fetcher,
            parser,
            TextChunker::new(config.ingest.chunk_size, config.ingest.chunk_overlap),
            embedder.clone(),
        );

        let rag = RagGenerator::new(provider.clone(), embedder, &config.model)
            .with_temperature(sampling.rag_temperature)
            .with_max_tokens(sampling.max_tokens)
            .with_top_k(config.retrieval.top_k)
            .with_condensing(config.retrieval.condense_questions);

        let resolver = ReplyResolver::new(
            &assistant.role,
            assistant.intents.clone(),
            assistant.replies.clone(),
            provider.clone(),
            &config.model,
            rag,
        )
        .with_segment_assignments(assistant.segment_assignments.clone())
        .with_dont_know(DontKnowResponses::from_config(assistant.dont_know_response.as_ref()))
        .with_role_temperature(sampling.role_reply_temperature)
        .with_max_tokens(sampling.max_tokens);

        let classifier =
            IntentClassifier::new(provider, &config.model, sampling.classification_temperature);

        Ok(Self {
            role: assistant.role.clone(),
            intents: assistant.intents.clone(),
            segments: assistant.pdf_urls.segments(),
            builder,
            store: DocumentIndexStore::new(),
            memory: ConversationMemory::new(),
            classifier,
            resolver,
        })
    }

    /// Build every segment's index. Segments that fail are logged and left
    /// out; the rest remain queryable.
    pub async fn initialize(&mut self) -> InitReport {
        let report = self.store.initialize(&self.builder, &self.segments).await;

        for failure in &report.failed {
            error!(segment = %failure.segment, error = %failure.error, "Segment unavailable");
        }
        info!(
            "Assistant initialized with {} segments: {}",
            report.built.len(),
            report.built.join(", ")
        );
        report
    }

    /// Answer `query` and record the turn.
    ///
    /// Fails with [`Error::NotInitialized`] until at least one segment index
    /// exists. On any error the turn is not recorded.
    pub async fn respond(&mut self, query: &str) -> Result<String> {
        if self.store.is_empty() {
            return Err(Error::NotInitialized);
        }

        let intent = self.classifier.classify(query, &self.role, &self.intents).await?;
        let reply = self
            .resolver
            .resolve(&intent, query, &self.store, &self.memory)
            .await?;

        self.memory.append(query, reply.clone());
        info!(intent = %intent, turns = self.memory.len(), "Turn recorded");
        Ok(reply)
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn store(&self) -> &DocumentIndexStore {
        &self.store
    }

    /// Declared segments and their sources, after normalization.
    pub fn segments(&self) -> &BTreeMap<String, Vec<String>> {
        &self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::UNKNOWN_INTENT_REPLY;
    use crate::test_helpers::{MockFetcher, SequentialMockProvider};
    use std::collections::HashMap;
    use voibot_config::{DocumentSources, DontKnowConfig};
    use voibot_core::ReplyKind;
    use voibot_index::PlainTextParser;

    const POLICY_URL: &str = "https://example.com/policy.pdf";
    const BILLING_URL: &str = "https://example.com/billing.pdf";

    fn config(sources: DocumentSources) -> AppConfig {
        let mut config = AppConfig::default();
        config.assistant.role = "a support agent".into();
        config.assistant.intents = ["greeting", "refund", "billing", "smalltalk"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        config.assistant.replies = HashMap::from([
            ("greeting".to_string(), ReplyKind::from("Hello, {most_recent_query}!")),
            ("refund".to_string(), ReplyKind::Rag),
            ("billing".to_string(), ReplyKind::Rag),
            ("smalltalk".to_string(), ReplyKind::RoleBasedGeneration),
        ]);
        config.assistant.segment_assignments =
            HashMap::from([("billing".to_string(), "billing".to_string())]);
        config.assistant.dont_know_response =
            Some(DontKnowConfig::Global("Please contact support.".into()));
        config.assistant.pdf_urls = sources;
        config
    }

    fn fetcher() -> Arc<MockFetcher> {
        Arc::new(MockFetcher::default().with(POLICY_URL, "Refunds are accepted within 30 days."))
    }

    fn assistant(config: &AppConfig, provider: Arc<SequentialMockProvider>) -> Assistant {
        Assistant::with_collaborators(config, provider, fetcher(), Arc::new(PlainTextParser)).unwrap()
    }

    #[tokio::test]
    async fn respond_before_initialize_fails() {
        let provider = Arc::new(SequentialMockProvider::texts(&[]));
        let mut assistant = assistant(&config(DocumentSources::Single(POLICY_URL.into())), provider.clone());

        let err = assistant.respond("hi").await.unwrap_err();

        assert!(matches!(err, Error::NotInitialized));
        assert_eq!(provider.call_count(), 0);
        assert!(assistant.memory().is_empty());
    }

    #[tokio::test]
    async fn respond_fails_when_no_segment_was_built() {
        let provider = Arc::new(SequentialMockProvider::texts(&["greeting"]));
        let mut assistant = Assistant::with_collaborators(
            &config(DocumentSources::Single(POLICY_URL.into())),
            provider.clone(),
            Arc::new(MockFetcher::default()),
            Arc::new(PlainTextParser),
        )
        .unwrap();

        let report = assistant.initialize().await;
        assert!(report.built.is_empty());
        assert_eq!(report.failed.len(), 1);

        let err = assistant.respond("hi").await.unwrap_err();
        assert!(matches!(err, Error::NotInitialized));
        assert_eq!(provider.call_count(), 0);
        assert!(assistant.memory().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = config(DocumentSources::Single(POLICY_URL.into()));
        config.ingest.chunk_overlap = config.ingest.chunk_size;
        let provider = Arc::new(SequentialMockProvider::texts(&[]));

        let result =
            Assistant::with_collaborators(&config, provider, fetcher(), Arc::new(PlainTextParser));

        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn greeting_then_rag_scenario() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "greeting",
            "refund",
            "Standalone: how do I get a refund?",
            "Refunds are accepted within 30 days.",
        ]));
        let mut assistant = assistant(&config(DocumentSources::Single(POLICY_URL.into())), provider.clone());

        let report = assistant.initialize().await;
        assert_eq!(report.built, ["unified"]);

        let greeting = assistant.respond("hi").await.unwrap();
        assert_eq!(greeting, "Hello, Error: Most recent query could not be retrieved!");

        let answer = assistant.respond("how do I get a refund?").await.unwrap();
        assert_eq!(answer, "Refunds are accepted within 30 days.");

        let memory = assistant.memory();
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.most_recent_query().unwrap(), "how do I get a refund?");
        assert_eq!(memory.most_recent_response().unwrap(), answer);
    }

    #[tokio::test]
    async fn unreachable_segment_is_absent_but_others_work() {
        let sources = DocumentSources::Segments(BTreeMap::from([
            ("unified".to_string(), vec![POLICY_URL.to_string()]),
            ("billing".to_string(), vec![BILLING_URL.to_string()]),
        ]));
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "billing",
            "refund",
            "Refunds are accepted within 30 days.",
        ]));
        let mut assistant = assistant(&config(sources), provider);

        let report = assistant.initialize().await;
        assert_eq!(report.built, ["unified"]);
        assert_eq!(report.failed[0].segment, "billing");

        let err = assistant.respond("when am I billed?").await.unwrap_err();
        assert!(matches!(err, Error::MissingSegment { ref segment } if segment == "billing"));
        assert!(assistant.memory().is_empty());

        let answer = assistant.respond("refund please").await.unwrap();
        assert_eq!(answer, "Refunds are accepted within 30 days.");
        assert_eq!(assistant.memory().len(), 1);
    }

    #[tokio::test]
    async fn memory_tracks_every_turn_in_order() {
        let provider = Arc::new(SequentialMockProvider::texts(&[
            "smalltalk",
            "Doing well!",
            "weather",
            "greeting",
        ]));
        let mut assistant = assistant(&config(DocumentSources::Single(POLICY_URL.into())), provider);
        assistant.initialize().await;

        assert_eq!(assistant.respond("how are you?").await.unwrap(), "Doing well!");
        assert_eq!(assistant.respond("is it sunny?").await.unwrap(), UNKNOWN_INTENT_REPLY);
        assert_eq!(assistant.respond("hi again").await.unwrap(), "Hello, is it sunny?!");

        let memory = assistant.memory();
        assert_eq!(memory.len(), 3);
        assert_eq!(memory.most_recent_query().unwrap(), "hi again");
        assert_eq!(memory.most_recent_response().unwrap(), "Hello, is it sunny?!");
    }

    #[tokio::test]
    async fn dont_know_is_replaced_with_configured_reply() {
        let mut config = config(DocumentSources::Single(POLICY_URL.into()));
        config.retrieval.condense_questions = false;
        let provider = Arc::new(SequentialMockProvider::texts(&["refund", "I don't know."]));
        let mut assistant = assistant(&config, provider);
        assistant.initialize().await;

        let reply = assistant.respond("refund for a gift card?").await.unwrap();
        assert_eq!(reply, "Please contact support.");
        assert_eq!(assistant.memory().most_recent_response().unwrap(), "Please contact support.");
    }

    #[tokio::test]
    async fn classification_failure_is_propagated() {
        let provider = Arc::new(SequentialMockProvider::new(vec![Err(
            voibot_core::error::ProviderError::Network("connection reset".into()),
        )]));
        let mut assistant = assistant(&config(DocumentSources::Single(POLICY_URL.into())), provider);
        assistant.initialize().await;

        let err = assistant.respond("hi").await.unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
        assert!(assistant.memory().is_empty());
    }

    #[test]
    fn list_sources_become_unified_segment() {
        let provider = Arc::new(SequentialMockProvider::texts(&[]));
        let sources = DocumentSources::List(vec![POLICY_URL.into(), BILLING_URL.into()]);
        let assistant = assistant(&config(sources), provider);
        assert_eq!(assistant.segments().len(), 1);
        assert_eq!(assistant.segments()["unified"].len(), 2);
    }
}
