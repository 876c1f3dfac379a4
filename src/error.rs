//! Error types for the application.

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read environment file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Bot token still contains the placeholder value")]
    PlaceholderToken,

    #[error("Invalid channel username: {0:?}")]
    InvalidChannel(String),
}

impl ConfigError {
    /// Whether the bot token itself is absent or unusable.
    pub fn is_token_problem(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingEnvVar(_) | ConfigError::PlaceholderToken
        )
    }
}

/// Errors surfaced by update handlers to the dispatcher's error handler.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Invalid button URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
