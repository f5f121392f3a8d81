//! Error types for the Voibot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the top-level [`Error`]
//! adds the routing-level failures the assistant can signal.

use thiserror::Error;

/// The top-level error type for all Voibot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Routing errors ---
    #[error("Intent classification failed: {0}")]
    Classification(#[source] ProviderError),

    #[error("No index found for segment '{segment}'")]
    MissingSegment { segment: String },

    #[error("Document index store has not been initialized")]
    UninitializedStore,

    #[error("Assistant is not initialized: call initialize() and build at least one segment")]
    NotInitialized,

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures while turning a segment's sources into an index.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to parse {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Segment '{0}' declares no documents")]
    EmptySegment(String),
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Most recent {0} could not be retrieved")]
    NotFound(&'static str),
}
