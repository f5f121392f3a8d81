//! `voibot ingest` — Build every segment index and report the outcome.

use std::path::Path;
use voibot_agent::Assistant;
use voibot_index::InitReport;

use super::{load_config, require_api_key};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    require_api_key(&config)?;

    let mut assistant = Assistant::from_config(&config)?;
    if assistant.segments().is_empty() {
        return Err("No documents configured. Set assistant.pdf_urls in the config file.".into());
    }

    let report = assistant.initialize().await;
    print_report(&report);

    if report.built.is_empty() {
        return Err("No segment could be built.".into());
    }
    Ok(())
}

/// Print which segments were built and why the others failed.
pub fn print_report(report: &InitReport) {
    println!();
    for segment in &report.built {
        println!("   ✅ {segment}");
    }
    for failure in &report.failed {
        println!("   ❌ {}: {}", failure.segment, failure.error);
    }
    println!();
}
