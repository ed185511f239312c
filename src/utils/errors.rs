//! Error handling for Avangard
//!
//! This module defines the main error type used throughout the application.
//! Infrastructure failures convert via `#[from]`; domain failures get their
//! own variants so callers can branch on the kind instead of catching a
//! generic fault.

use thiserror::Error;

/// Main error type for the Avangard application
#[derive(Error, Debug)]
pub enum AvangardError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Account already registered: telegram_id={telegram_id}")]
    DuplicateRegistration { telegram_id: i64 },

    #[error("Key generation exhausted after {attempts} attempts")]
    KeyGenerationExhausted { attempts: u32 },

    #[error("User not found: telegram_id={telegram_id}")]
    UserNotFound { telegram_id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream call failed with status {status}: {body}")]
    Upstream { status: u16, body: String },
}

impl From<config::ConfigError> for AvangardError {
    fn from(err: config::ConfigError) -> Self {
        AvangardError::Config(err.to_string())
    }
}

/// Result type alias for Avangard operations
pub type Result<T> = std::result::Result<T, AvangardError>;
