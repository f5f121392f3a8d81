//! # Voibot Core
//!
//! Domain types, traits, and error definitions for the Voibot conversational
//! assistant. This crate does no I/O: it defines the domain model that the
//! other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (LLM provider, document fetcher, document
//! parser) is defined as a trait here. Implementations live in their
//! respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted mock implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod conversation;
pub mod document;
pub mod error;
pub mod message;
pub mod provider;
pub mod reply;

// Re-export key types at crate root for ergonomics
pub use conversation::Turn;
pub use document::{DocumentFetcher, DocumentParser, PageText};
pub use error::{Error, Result};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use reply::{ReplyKind, UNIFIED_SEGMENT};
