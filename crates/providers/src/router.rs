//! Provider construction from configuration.

use std::sync::Arc;
use tracing::info;
use voibot_core::error::ProviderError;
use voibot_core::provider::Provider;
use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured provider.
///
/// The API key is taken from `config.api_key` only; it is never read from or
/// written to the process environment here.
pub fn build_from_config(
    config: &voibot_config::AppConfig,
) -> Result<Arc<dyn Provider>, ProviderError> {
    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    let api_key = match (&config.api_key, requires_key(&config.provider)) {
        (Some(key), _) => key.clone(),
        (None, false) => String::new(),
        (None, true) => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key configured for provider '{}'",
                config.provider
            )));
        }
    };

    info!(provider = %config.provider, base_url = %base_url, model = %config.model, "Provider configured");

    Ok(Arc::new(OpenAiCompatProvider::new(
        &config.provider,
        &base_url,
        &api_key,
    )))
}

/// Local servers accept any key.
pub fn requires_key(provider_name: &str) -> bool {
    !matches!(provider_name, "ollama" | "vllm" | "llamacpp" | "llama.cpp")
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
