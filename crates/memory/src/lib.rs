//! Conversation memory for Voibot.

pub mod conversation;

pub use conversation::{ConversationMemory, or_sentinel};
