//! Configuration management.
//!
//! Everything is read from the environment. A `.env` file is loaded first when
//! present, searched in this order:
//! 1. An explicit path passed on the command line (must exist)
//! 2. `./.env`
//! 3. `<user config dir>/reaction-gate-bot/.env`
//!
//! Variables already set in the process environment are never overridden.

use crate::error::ConfigError;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use teloxide::types::Recipient;

/// Environment variable holding the bot token.
pub const TOKEN_VAR: &str = "BOT_TOKEN";

/// Accepted alias for [`TOKEN_VAR`].
pub const TOKEN_VAR_ALIAS: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the mandatory channel's username.
pub const CHANNEL_VAR: &str = "MAIN_CHANNEL_USERNAME";

/// Channel used when [`CHANNEL_VAR`] is not set.
pub const DEFAULT_CHANNEL: &str = "Unix_Bots";

const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN";

/// Default `.env` location inside the user's config directory.
pub fn default_env_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "reaction-gate-bot")
        .map(|dirs| dirs.config_dir().join(".env"))
}

/// Username of the channel users must join, stored without the leading `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef(String);

impl ChannelRef {
    /// Parse a channel username, accepting an optional leading `@`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let name = raw.trim().trim_start_matches('@');
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');

        if !valid {
            return Err(ConfigError::InvalidChannel(raw.to_string()));
        }

        Ok(Self(name.to_string()))
    }

    pub fn username(&self) -> &str {
        &self.0
    }

    /// Public link to the channel.
    pub fn url(&self) -> String {
        format!("https://t.me/{}", self.0)
    }

    /// Chat reference accepted by the Bot API (`@username`).
    pub fn recipient(&self) -> Recipient {
        Recipient::ChannelUsername(format!("@{}", self.0))
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token
    pub bot_token: String,
    /// Channel whose membership gates private-chat usage
    pub channel: ChannelRef,
}

impl Config {
    /// Load the `.env` file (if any) and then read the environment.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound(path.to_path_buf()));
                }
                dotenvy::from_path(path)?;
            }
            None => {
                // Missing files are fine here, the environment may be complete
                if dotenvy::dotenv().is_err() {
                    if let Some(path) = default_env_path() {
                        let _ = dotenvy::from_path(path);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key/value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup(TOKEN_VAR)
            .or_else(|| lookup(TOKEN_VAR_ALIAS))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(TOKEN_VAR.to_string()))?;

        if bot_token.contains(TOKEN_PLACEHOLDER) {
            return Err(ConfigError::PlaceholderToken);
        }

        let channel = match lookup(CHANNEL_VAR) {
            Some(raw) if !raw.trim().is_empty() => ChannelRef::parse(&raw)?,
            _ => ChannelRef::parse(DEFAULT_CHANNEL)?,
        };

        Ok(Self { bot_token, channel })
    }

    /// Token with the secret half hidden, for status output.
    pub fn masked_token(&self) -> String {
        match self.bot_token.split_once(':') {
            Some((bot_id, _)) => format!("{}:****", bot_id),
            None => "****".to_string(),
        }
    }
}
