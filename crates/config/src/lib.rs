//! Configuration loading, validation, and management for Voibot.
//!
//! Loads configuration from `~/.voibot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use voibot_core::ReplyKind;
use voibot_core::reply::UNIFIED_SEGMENT;

/// The root configuration structure.
///
/// Maps directly to `~/.voibot/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the LLM provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider name
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Chat model used for classification and generation
    #[serde(default = "default_model")]
    pub model: String,

    /// Embedding model used to build and query segment indices
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling settings per call site
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Document ingestion settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Retrieval settings for RAG replies
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// The assistant's persona, intents and reply routing
    #[serde(default)]
    pub assistant: AssistantConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("embedding_model", &self.embedding_model)
            .field("sampling", &self.sampling)
            .field("ingest", &self.ingest)
            .field("retrieval", &self.retrieval)
            .field("assistant", &self.assistant)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Low randomness: biased toward the single best intent label
    #[serde(default = "default_classification_temperature")]
    pub classification_temperature: f32,

    #[serde(default = "default_creative_temperature")]
    pub role_reply_temperature: f32,

    #[serde(default = "default_creative_temperature")]
    pub rag_temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_classification_temperature() -> f32 {
    0.5
}
fn default_creative_temperature() -> f32 {
    0.9
}
fn default_max_tokens() -> u32 {
    1024
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            classification_temperature: default_classification_temperature(),
            role_reply_temperature: default_creative_temperature(),
            rag_temperature: default_creative_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    #[serde(default = "default_embedding_batch_size")]
    pub embedding_batch_size: usize,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_chunk_size() -> usize {
    1000
}
fn default_chunk_overlap() -> usize {
    200
}
fn default_embedding_batch_size() -> usize {
    64
}
fn default_fetch_timeout_secs() -> u64 {
    60
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            embedding_batch_size: default_embedding_batch_size(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Chunks retrieved per RAG query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Rewrite follow-up questions into standalone ones using the history
    #[serde(default = "default_true")]
    pub condense_questions: bool,
}

fn default_top_k() -> usize {
    4
}
fn default_true() -> bool {
    true
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            condense_questions: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Persona consulted by classification and role-based replies
    #[serde(default = "default_role")]
    pub role: String,

    /// Closed intent vocabulary
    #[serde(default)]
    pub intents: BTreeSet<String>,

    /// Document sources, per segment
    #[serde(default)]
    pub pdf_urls: DocumentSources,

    /// Intent → reply kind ("RAG", "role_based_llm_reply", or a template)
    #[serde(default)]
    pub replies: HashMap<String, ReplyKind>,

    /// Intent → segment name (unassigned intents use "unified")
    #[serde(default)]
    pub segment_assignments: HashMap<String, String>,

    /// Replacement for a bare "I don't know" RAG answer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dont_know_response: Option<DontKnowConfig>,
}

fn default_role() -> String {
    "a helpful customer support assistant".into()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            role: default_role(),
            intents: BTreeSet::new(),
            pdf_urls: DocumentSources::default(),
            replies: HashMap::new(),
            segment_assignments: HashMap::new(),
            dont_know_response: None,
        }
    }
}

/// Where a segment's documents come from.
///
/// A single URL or a plain list feeds the implicit "unified" segment; a table
/// names each segment explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentSources {
    Single(String),
    List(Vec<String>),
    Segments(BTreeMap<String, Vec<String>>),
}

impl Default for DocumentSources {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl DocumentSources {
    /// Normalize into segment name → ordered source list.
    pub fn segments(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            Self::Single(url) => BTreeMap::from([(UNIFIED_SEGMENT.to_string(), vec![url.clone()])]),
            Self::List(urls) if urls.is_empty() => BTreeMap::new(),
            Self::List(urls) => BTreeMap::from([(UNIFIED_SEGMENT.to_string(), urls.clone())]),
            Self::Segments(map) => map.clone(),
        }
    }
}

/// Either one fallback for every intent, or a per-intent table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DontKnowConfig {
    Global(String),
    PerIntent(HashMap<String, String>),
}

impl AppConfig {
    /// Load configuration from the default path (~/.voibot/config.toml).
    ///
    /// Also checks environment variables:
    /// - `VOIBOT_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `VOIBOT_PROVIDER`, `VOIBOT_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_path(&Self::config_dir().join("config.toml"))
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_path(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = lookup("VOIBOT_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }
        if let Some(provider) = lookup("VOIBOT_PROVIDER") {
            self.provider = provider;
        }
        if let Some(model) = lookup("VOIBOT_MODEL") {
            self.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".voibot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temps = [
            ("classification_temperature", self.sampling.classification_temperature),
            ("role_reply_temperature", self.sampling.role_reply_temperature),
            ("rag_temperature", self.sampling.rag_temperature),
        ];
        for (name, t) in temps {
            if !(0.0..=2.0).contains(&t) {
                return Err(ConfigError::ValidationError(format!(
                    "sampling.{name} must be between 0.0 and 2.0"
                )));
            }
        }

        if self.ingest.chunk_size == 0 {
            return Err(ConfigError::ValidationError("ingest.chunk_size must be > 0".into()));
        }
        if self.ingest.chunk_overlap >= self.ingest.chunk_size {
            return Err(ConfigError::ValidationError(
                "ingest.chunk_overlap must be smaller than ingest.chunk_size".into(),
            ));
        }
        if self.ingest.embedding_batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "ingest.embedding_batch_size must be > 0".into(),
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(ConfigError::ValidationError("retrieval.top_k must be > 0".into()));
        }

        let assistant = &self.assistant;
        let undeclared = |table: &str, key: &String| {
            ConfigError::ValidationError(format!(
                "assistant.{table} references undeclared intent '{key}'"
            ))
        };
        if let Some(key) = assistant.replies.keys().find(|k| !assistant.intents.contains(*k)) {
            return Err(undeclared("replies", key));
        }
        if let Some(key) = assistant
            .segment_assignments
            .keys()
            .find(|k| !assistant.intents.contains(*k))
        {
            return Err(undeclared("segment_assignments", key));
        }
        if let Some(DontKnowConfig::PerIntent(map)) = &assistant.dont_know_response
            && let Some(key) = map.keys().find(|k| !assistant.intents.contains(*k))
        {
            return Err(undeclared("dont_know_response", key));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            embedding_model: default_embedding_model(),
            sampling: SamplingConfig::default(),
            ingest: IngestConfig::default(),
            retrieval: RetrievalConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
