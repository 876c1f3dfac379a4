//! Reaction Gate Bot - CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;
use reaction_gate_bot::bot;
use reaction_gate_bot::cli::{Cli, Commands};
use reaction_gate_bot::config::{Config, CHANNEL_VAR, TOKEN_VAR};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, keeping the HTTP stack quiet
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
                .add_directive("reqwest=warn".parse()?)
                .add_directive("hyper=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = match Config::load(cli.env_file.as_deref()) {
                Ok(config) => config,
                Err(e) => {
                    if e.is_token_problem() {
                        tracing::error!("!!! BOT TOKEN IS MISSING OR INVALID !!! ({})", e);
                        tracing::error!("Set {} in the environment or a .env file.", TOKEN_VAR);
                    } else {
                        tracing::error!("Invalid configuration: {}", e);
                    }
                    return Err(e).context("Refusing to start without a usable configuration");
                }
            };
            bot::run(config).await.context("Failed to run Telegram bot")?;
        }
        Commands::Status => {
            print_status(cli.env_file.as_deref());
        }
    }

    Ok(())
}

/// Print configuration status.
fn print_status(env_file: Option<&Path>) {
    println!("📊 Reaction Gate Bot Status\n");

    match Config::load(env_file) {
        Ok(config) => {
            println!("✅ Configuration: Found");
            println!("   Token: {}", config.masked_token());
            println!("   Mandatory channel: {}", config.channel);
            println!("   Channel link: {}", config.channel.url());
        }
        Err(e) => {
            println!("❌ Configuration: Not found or invalid");
            println!("   Error: {}", e);
            println!();
            println!("Set these in the environment or a .env file:");
            println!("  {}=123456:ABC...", TOKEN_VAR);
            println!("  {}=YourChannel   (optional)", CHANNEL_VAR);
        }
    }
}
