//! Reply resolution: turns a classified intent into exactly one reply.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};
use voibot_config::DontKnowConfig;
use voibot_core::error::Result;
use voibot_core::provider::{Provider, ProviderRequest};
use voibot_core::reply::{
    MOST_RECENT_QUERY, MOST_RECENT_RESPONSE, ReplyKind, UNIFIED_SEGMENT, template_placeholder,
};
use voibot_index::DocumentIndexStore;
use voibot_memory::{ConversationMemory, or_sentinel};

use crate::prompts;
use crate::rag::RagGenerator;

/// Reply for labels outside the intent vocabulary.
pub const UNKNOWN_INTENT_REPLY: &str = "Unfortunately, I am unable to help you with that.";

/// Template used for an intent with no configured reply.
pub const DEFAULT_TEMPLATE: &str = "I'm not sure how to respond to that.";

/// Replacement for a RAG "I don't know" when nothing is configured.
pub const DEFAULT_DONT_KNOW_REPLY: &str = "I'm sorry, I don't have enough information to answer that.";

/// "I don't know" replacements, resolved once from configuration.
#[derive(Debug, Clone)]
pub struct DontKnowResponses {
    per_intent: HashMap<String, String>,
    default: String,
}

impl DontKnowResponses {
    pub fn from_config(config: Option<&DontKnowConfig>) -> Self {
        match config {
            None => Self {
                per_intent: HashMap::new(),
                default: DEFAULT_DONT_KNOW_REPLY.into(),
            },
            Some(DontKnowConfig::Global(reply)) => Self {
                per_intent: HashMap::new(),
                default: reply.clone(),
            },
            Some(DontKnowConfig::PerIntent(map)) => Self {
                per_intent: map.clone(),
                default: DEFAULT_DONT_KNOW_REPLY.into(),
            },
        }
    }

    pub fn for_intent(&self, intent: &str) -> &str {
        self.per_intent.get(intent).unwrap_or(&self.default)
    }
}

fn is_dont_know(answer: &str) -> bool {
    matches!(answer.trim(), "I don't know" | "I don't know.")
}

/// Fill a template from memory. Only the first placeholder kind found is
/// substituted: `{most_recent_response}` takes precedence.
pub fn render_template(template: &str, memory: &ConversationMemory) -> String {
    match template_placeholder(template) {
        Some(MOST_RECENT_RESPONSE) => {
            template.replace(MOST_RECENT_RESPONSE, &or_sentinel(memory.most_recent_response()))
        }
        Some(MOST_RECENT_QUERY) => {
            template.replace(MOST_RECENT_QUERY, &or_sentinel(memory.most_recent_query()))
        }
        _ => template.to_string(),
    }
}

/// Dispatches an intent to its configured reply strategy.
pub struct ReplyResolver {
    role: String,
    intents: BTreeSet<String>,
    replies: HashMap<String, ReplyKind>,
    segment_assignments: HashMap<String, String>,
    dont_know: DontKnowResponses,
    provider: Arc<dyn Provider>,
    model: String,
    role_temperature: f32,
    max_tokens: Option<u32>,
    rag: RagGenerator,
}

impl ReplyResolver {
    pub fn new(
        role: impl Into<String>,
        intents: BTreeSet<String>,
        replies: HashMap<String, ReplyKind>,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        rag: RagGenerator,
    ) -> Self {
        Self {
            role: role.into(),
            intents,
            replies,
            segment_assignments: HashMap::new(),
            dont_know: DontKnowResponses::from_config(None),
            provider,
            model: model.into(),
            role_temperature: 0.9,
            max_tokens: None,
            rag,
        }
    }

    pub fn with_segment_assignments(mut self, assignments: HashMap<String, String>) -> Self {
        self.segment_assignments = assignments;
        self
    }

    pub fn with_dont_know(mut self, dont_know: DontKnowResponses) -> Self {
        self.dont_know = dont_know;
        self
    }

    pub fn with_role_temperature(mut self, temperature: f32) -> Self {
        self.role_temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The segment RAG replies for `intent` are drawn from.
    pub fn segment_for(&self, intent: &str) -> &str {
        self.segment_assignments
            .get(intent)
            .map(String::as_str)
            .unwrap_or(UNIFIED_SEGMENT)
    }

    /// Produce the reply for `intent`.
    ///
    /// Unknown intents and empty memory never fail. A RAG intent fails with
    /// `UninitializedStore` before the store is built and `MissingSegment`
    /// when its segment has no index.
    pub async fn resolve(
        &self,
        intent: &str,
        query: &str,
        store: &DocumentIndexStore,
        memory: &ConversationMemory,
    ) -> Result<String> {
        if !self.intents.contains(intent) {
            warn!(intent = %intent, "Intent not in vocabulary");
            return Ok(UNKNOWN_INTENT_REPLY.to_string());
        }

        match self.replies.get(intent) {
            Some(ReplyKind::Rag) => {
                let segment = self.segment_for(intent);
                let index = store.get(segment)?;
                let answer = self.rag.run(index, query, memory.history()).await?;
                if is_dont_know(&answer.answer) {
                    debug!(intent = %intent, "RAG answer was 'I don't know', substituting");
                    return Ok(self.dont_know.for_intent(intent).to_string());
                }
                Ok(answer.answer)
            }
            Some(ReplyKind::RoleBasedGeneration) => {
                let mut request = ProviderRequest::new(
                    &self.model,
                    prompts::role_reply(query, intent, &self.role),
                    self.role_temperature,
                );
                if let Some(max_tokens) = self.max_tokens {
                    request = request.with_max_tokens(max_tokens);
                }
                let response = self.provider.complete(request).await?;
                Ok(response.message.content)
            }
            Some(ReplyKind::StaticTemplate(template)) => Ok(render_template(template, memory)),
            None => Ok(render_template(DEFAULT_TEMPLATE, memory)),
        }
    }
}
