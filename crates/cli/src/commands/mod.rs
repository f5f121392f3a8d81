pub mod chat;
pub mod config_cmd;
pub mod ingest;

use std::path::Path;
use voibot_config::AppConfig;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => AppConfig::load_path(path),
        None => AppConfig::load(),
    };
    config.map_err(|e| format!("Failed to load config: {e}").into())
}

/// Fail early with setup instructions when no credential is available.
pub fn require_api_key(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.has_api_key() || !voibot_providers::requires_key(&config.provider) {
        return Ok(());
    }

    eprintln!();
    eprintln!("  ERROR: No API key configured!");
    eprintln!();
    eprintln!("  Set one of these environment variables:");
    eprintln!("    VOIBOT_API_KEY = 'sk-...'   (used when config.toml has no api_key)");
    eprintln!("    OPENAI_API_KEY = 'sk-...'   (used when VOIBOT_API_KEY is unset)");
    eprintln!();
    eprintln!("  Or add it to your config file:");
    eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
    eprintln!();
    Err("No API key found. See above for setup instructions.".into())
}
