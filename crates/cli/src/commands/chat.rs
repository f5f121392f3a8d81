//! `voibot chat` — Interactive or single-message chat mode.

use std::io::Write;
use std::path::Path;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use voibot_agent::Assistant;

use super::ingest::print_report;
use super::{load_config, require_api_key};

pub async fn run(
    config_path: Option<&Path>,
    message: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    require_api_key(&config)?;

    let mut assistant = Assistant::from_config(&config)?;

    eprint!("  Loading documents...");
    let report = assistant.initialize().await;
    eprint!("\r                      \r");
    if !report.is_complete() {
        print_report(&report);
    }

    if let Some(msg) = message {
        // Single message mode
        let response = assistant.respond(&msg).await?;
        println!("{response}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          Voibot — Interactive Mode           ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.provider);
    println!("  Model:     {}", config.model);
    println!("  Role:      {}", config.assistant.role);
    println!("  Intents:   {}", config.assistant.intents.len());
    println!("  Segments:  {}", report.built.join(", "));
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if matches!(line, "exit" | "quit") {
            break;
        }
        if !line.is_empty() {
            eprint!("  ...");
            match assistant.respond(line).await {
                Ok(response) => {
                    eprint!("\r     \r");
                    println!();
                    for text in response.lines() {
                        println!("  Assistant > {text}");
                    }
                    println!();
                }
                Err(e) => {
                    eprint!("\r     \r");
                    eprintln!("  [Error] {e}");
                    println!();
                }
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
