//! Archived message model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A free-text message received outside of a registration flow.
///
/// The archive is append-only; rows are never mutated or deleted.
#[derive(Debug, Clone, FromRow)]
pub struct ArchivedMessage {
    pub id: i64,
    pub message_id: i32,
    pub user_id: i64,
    pub chat_id: i64,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload for archiving a new message; the sequential `id` is allocated
/// at insert time.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub message_id: i32,
    pub user_id: i64,
    pub chat_id: i64,
    pub text: String,
}
