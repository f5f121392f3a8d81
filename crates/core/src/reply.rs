//! Reply kinds — how an intent is answered.
//!
//! In configuration a reply is a plain string: `"RAG"`, `"role_based_llm_reply"`,
//! or anything else, which is taken as a literal template. Internally it is a
//! closed enum so every routing site handles all three strategies.

use serde::{Deserialize, Serialize};

/// Segment used when an intent has no explicit segment assignment.
pub const UNIFIED_SEGMENT: &str = "unified";

/// Configuration tag selecting retrieval-augmented generation.
pub const RAG_TAG: &str = "RAG";

/// Configuration tag selecting a free-form role-conditioned reply.
pub const ROLE_BASED_TAG: &str = "role_based_llm_reply";

/// Placeholder replaced with the most recent assistant response.
pub const MOST_RECENT_RESPONSE: &str = "{most_recent_response}";

/// Placeholder replaced with the most recent user query.
pub const MOST_RECENT_QUERY: &str = "{most_recent_query}";

/// How an intent's reply is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReplyKind {
    /// Retrieve from the intent's segment index and generate a grounded answer.
    Rag,
    /// Free-form generation conditioned on the assistant role and the intent.
    RoleBasedGeneration,
    /// A literal reply, optionally containing one history placeholder.
    StaticTemplate(String),
}

/// The history placeholder a template substitutes, `{most_recent_response}` first.
pub fn template_placeholder(template: &str) -> Option<&'static str> {
    if template.contains(MOST_RECENT_RESPONSE) {
        Some(MOST_RECENT_RESPONSE)
    } else if template.contains(MOST_RECENT_QUERY) {
        Some(MOST_RECENT_QUERY)
    } else {
        None
    }
}

impl From<String> for ReplyKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            RAG_TAG => Self::Rag,
            ROLE_BASED_TAG => Self::RoleBasedGeneration,
            _ => Self::StaticTemplate(value),
        }
    }
}

impl From<&str> for ReplyKind {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<ReplyKind> for String {
    fn from(kind: ReplyKind) -> Self {
        match kind {
            ReplyKind::Rag => RAG_TAG.into(),
            ReplyKind::RoleBasedGeneration => ROLE_BASED_TAG.into(),
            ReplyKind::StaticTemplate(t) => t,
        }
    }
}
