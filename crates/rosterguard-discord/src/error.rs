//! Bot bootstrap errors.

use rosterguard_config::ConfigError;
use rosterguard_core::{ERROR_CONFIG, ERROR_GATEWAY, ERROR_STORE};
use rosterguard_store::StoreError;

/// Failure while starting or running the bot.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("discord: {0}")]
    Discord(#[from] serenity::Error),
}

impl BotError {
    /// Get the error type string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            BotError::Config(_) => ERROR_CONFIG,
            BotError::Store(_) => ERROR_STORE,
            BotError::Discord(_) => ERROR_GATEWAY,
        }
    }
}
