//! Append-only conversation log.
//!
//! Turns are kept in the order they happened and are never removed or
//! reordered; "most recent" lookups depend on that order. There is no
//! eviction, so a long-lived conversation grows without bound.

use serde::{Deserialize, Serialize};
use tracing::debug;
use voibot_core::error::MemoryError;
use voibot_core::Turn;

/// The ordered (query, response) history of one conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange at the end of the log.
    pub fn append(&mut self, query: impl Into<String>, response: impl Into<String>) {
        self.turns.push(Turn::new(query, response));
        debug!(turns = self.turns.len(), "Conversation turn recorded");
    }

    /// The newest assistant response.
    pub fn most_recent_response(&self) -> Result<&str, MemoryError> {
        self.turns
            .iter()
            .rev()
            .map(|t| t.response.as_str())
            .next()
            .ok_or(MemoryError::NotFound("response"))
    }

    /// The newest user query.
    pub fn most_recent_query(&self) -> Result<&str, MemoryError> {
        self.turns
            .iter()
            .rev()
            .map(|t| t.query.as_str())
            .next()
            .ok_or(MemoryError::NotFound("query"))
    }

    /// Read-only view of every turn, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// Resolve a lookup to its text, or to the user-visible not-found sentinel
/// (e.g. "Error: Most recent query could not be retrieved").
pub fn or_sentinel(lookup: Result<&str, MemoryError>) -> String {
    match lookup {
        Ok(text) => text.to_string(),
        Err(e) => format!("Error: {e}"),
    }
}
