//! User model and registration payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::{AvangardError, Result};

/// Minimum nickname length in characters.
pub const NICKNAME_MIN_CHARS: usize = 3;
/// Maximum nickname length in characters.
pub const NICKNAME_MAX_CHARS: usize = 32;

/// A registered user.
///
/// `id` is the application-allocated sequential integer, distinct from any
/// storage-native identifier. `key_hash` holds the peppered digest of the
/// access key; the raw key itself is never persisted.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub nickname: String,
    pub chats: Vec<i64>,
    pub key_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /v1/create_user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub tg_id: i64,
    pub nickname: String,
    pub chats: Vec<i64>,
}

/// Check the nickname length bounds (3..=32 characters, inclusive).
pub fn validate_nickname(nickname: &str) -> Result<()> {
    let len = nickname.chars().count();
    if (NICKNAME_MIN_CHARS..=NICKNAME_MAX_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(AvangardError::InvalidInput(format!(
            "nickname must be {NICKNAME_MIN_CHARS}-{NICKNAME_MAX_CHARS} characters, got {len}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_too_short_nickname() {
        assert!(validate_nickname("ab").is_err());
    }

    #[test]
    fn accepts_lower_bound() {
        assert!(validate_nickname("abc").is_ok());
    }

    #[test]
    fn accepts_upper_bound() {
        assert!(validate_nickname(&"x".repeat(32)).is_ok());
    }

    #[test]
    fn rejects_too_long_nickname() {
        assert!(validate_nickname(&"x".repeat(33)).is_err());
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Three Cyrillic characters are six bytes but still a valid length.
        assert!(validate_nickname("ник").is_ok());
    }
}
