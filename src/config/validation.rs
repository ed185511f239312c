//! Configuration validation

use tracing::warn;

use crate::config::Settings;
use crate::utils::errors::{AvangardError, Result};

/// Validate settings at startup.
///
/// A missing API key is deliberately not fatal here: the auth layer fails
/// every protected request closed instead, so a misconfigured deployment
/// cannot be mistaken for an open one.
pub fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.bot.token.is_empty() {
        return Err(AvangardError::Config(
            "bot token is not set (TELEGRAM_BOT_TOKEN)".to_string(),
        ));
    }

    if settings.database.url.is_empty() {
        return Err(AvangardError::Config(
            "database url is not set (DATABASE_URL)".to_string(),
        ));
    }

    if settings.database.max_connections == 0 {
        return Err(AvangardError::Config(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if settings.database.min_connections > settings.database.max_connections {
        return Err(AvangardError::Config(
            "database.min_connections exceeds max_connections".to_string(),
        ));
    }

    match settings.api.key.as_deref() {
        None | Some("") => {
            warn!("API_KEY is not configured; every protected request will be rejected");
        }
        Some(_) => {}
    }

    if settings.api.key_pepper.is_empty() {
        warn!("api.key_pepper is empty; key digests are unsalted");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.bot.token = "123:token".to_string();
        settings
    }

    #[test]
    fn accepts_valid_settings() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn rejects_missing_bot_token() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn rejects_zero_max_connections() {
        let mut settings = valid_settings();
        settings.database.max_connections = 0;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn missing_api_key_is_not_fatal() {
        let mut settings = valid_settings();
        settings.api.key = None;
        assert!(validate_settings(&settings).is_ok());
    }
}
