//! Bucket Bot - CLI entry point.
//!
//! Provides subcommands for the long-running Telegram bot, one-shot
//! submissions, and a configuration status report.

mod access;
mod bot;
mod cli;
mod config;
mod entry;
mod error;
mod flow;
mod well;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use entry::NewEntry;
use well::{WellApi, WellClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bot => {
            bot::run().await.context("Failed to run Telegram bot")?;
        }
        Commands::Submit {
            entry_type,
            content,
        } => {
            submit(entry_type, content)
                .await
                .context("Failed to file entry")?;
        }
        Commands::Status => {
            print_status()?;
        }
    }

    Ok(())
}

/// File a single entry from the command line.
async fn submit(entry_type: entry::EntryType, content: String) -> Result<()> {
    ensure!(!content.trim().is_empty(), "entry text is empty");

    let config = Config::load(None)?;
    let client = WellClient::new(&config.well)?;

    let receipt = client.submit(&NewEntry::new(entry_type, content)).await?;

    println!("✅ {} filed (status {})", entry_type.label(), receipt.status);
    if !receipt.body.is_empty() {
        println!("{}", receipt.body);
    }

    Ok(())
}

/// Print configuration status.
fn print_status() -> Result<()> {
    println!("🪣 Bucket Bot Status\n");

    match Config::load(None) {
        Ok(config) => {
            println!("✅ Configuration: Found");
            println!("   Hostname: {}", config.hostname);
            println!("   Authorized user: {}", config.authorized_user);
            println!("   Well URL: {}", config.well.url);
            println!("   Timeout: {}s", config.well.timeout_seconds);
        }
        Err(e) => {
            println!("❌ Configuration: Not found or invalid");
            println!("   Error: {}", e);
            println!();
            println!("Create config at ~/.bucketbot/config.json:");
            println!(
                r#"  {{"bot_token": "...", "authorized_user": "...", "well": {{"api_key": "..."}}}}"#
            );
            println!("or set BUCKETBOT_TOKEN, BUCKETBOT_USER_ID and WELL_API_KEY.");
        }
    }

    Ok(())
}
