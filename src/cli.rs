//! CLI argument parsing with subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Telegram auto-reaction bot with mandatory channel membership.
///
/// Runs the bot when started without a subcommand.
#[derive(Parser)]
#[command(name = "reaction-gate-bot")]
#[command(about = "Telegram auto-reaction bot with mandatory channel membership")]
#[command(version)]
pub struct Cli {
    /// Load environment variables from this file instead of searching for `.env`
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot until interrupted (default)
    Run,

    /// Show current configuration status
    Status,
}
