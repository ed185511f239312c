//! Configuration management

pub mod settings;
pub mod validation;

pub use settings::{ApiConfig, BotConfig, DatabaseConfig, LoggingConfig, Settings};
