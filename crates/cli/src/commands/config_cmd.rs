//! `voibot config` — Print the configuration.

use std::path::Path;
use voibot_config::AppConfig;

use super::load_config;

pub fn run(config_path: Option<&Path>, default: bool) -> Result<(), Box<dyn std::error::Error>> {
    if default {
        println!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config = load_config(config_path)?;
    println!("{}", redacted_toml(&config)?);
    Ok(())
}

/// The config as TOML with the API key masked.
fn redacted_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.api_key.is_some() {
        shown.api_key = Some("[REDACTED]".into());
    }
    toml::to_string_pretty(&shown)
}
