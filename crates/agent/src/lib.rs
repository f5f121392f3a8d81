//! The conversational core of Voibot.
//!
//! Every query goes through the same cycle:
//!
//! 1. **Classify** the query into one intent from a fixed vocabulary
//! 2. **Route** the intent to its reply kind:
//!    - RAG over the intent's segment index
//!    - a free-form reply conditioned on the assistant's role
//!    - a static template, optionally filled from conversation memory
//! 3. **Remember** the (query, reply) turn
//!
//! The [`Assistant`] owns the index store, the memory, the classifier and
//! the resolver, and is the only entry point the binary needs.

pub mod assistant;
pub mod classifier;
pub mod prompts;
pub mod rag;
pub mod resolver;

pub use assistant::Assistant;
pub use classifier::IntentClassifier;
pub use rag::{RagAnswer, RagGenerator};
pub use resolver::{DontKnowResponses, ReplyResolver, UNKNOWN_INTENT_REPLY};

#[cfg(test)]
pub(crate) mod test_helpers;
