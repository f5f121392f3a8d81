//! Conversation turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::Message;

/// One completed exchange: what the user asked and what the assistant answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub query: String,
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    pub fn new(query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            response: response.into(),
            timestamp: Utc::now(),
        }
    }

    /// The turn as a user message followed by an assistant message.
    pub fn to_messages(&self) -> [Message; 2] {
        [Message::user(&self.query), Message::assistant(&self.response)]
    }
}
