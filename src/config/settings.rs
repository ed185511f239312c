//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from an optional TOML file and environment
//! variables. The well-known unprefixed variables (`PORT`, `DATABASE_URL`,
//! `API_KEY`, `TELEGRAM_BOT_TOKEN`) override whatever the file or the
//! prefixed `AVANGARD__` form supplied.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Listen port, also used by the bot for its internal calls.
    pub port: u16,
    /// Shared secret expected in the X-API-Key header. Absence does not
    /// abort startup; every protected request fails closed instead.
    pub key: Option<String>,
    /// Pepper mixed into the access-key digest.
    pub key_pepper: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
}

impl Settings {
    /// Load settings from the configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("bot.token", "")?
            .set_default("database.url", "postgresql://localhost/avangard")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("api.port", 8000)?
            .set_default("api.key_pepper", "")?
            .set_default("logging.level", "info")?
            .set_default("logging.directory", "./logs")?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("AVANGARD").separator("__"))
            .set_override_option("api.port", std::env::var("PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("api.key", std::env::var("API_KEY").ok())?
            .set_override_option("bot.token", std::env::var("TELEGRAM_BOT_TOKEN").ok())?
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::AvangardError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/avangard".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            api: ApiConfig {
                port: 8000,
                key: None,
                key_pepper: String::new(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "./logs".to_string(),
            },
        }
    }
}
