//! Message archive repository

use chrono::Utc;
use sqlx::PgPool;

use crate::models::message::{ArchivedMessage, NewMessage};
use crate::utils::errors::AvangardError;

#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Allocate the next sequential message id (`max(id) + 1`, 1 when empty).
    pub async fn next_id(&self) -> Result<i64, AvangardError> {
        let id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM messages")
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    /// Append a message to the archive.
    pub async fn archive(&self, message: NewMessage) -> Result<ArchivedMessage, AvangardError> {
        let id = self.next_id().await?;

        let archived = sqlx::query_as::<_, ArchivedMessage>(
            r#"
            INSERT INTO messages (id, message_id, user_id, chat_id, text, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, message_id, user_id, chat_id, text, timestamp
            "#,
        )
        .bind(id)
        .bind(message.message_id)
        .bind(message.user_id)
        .bind(message.chat_id)
        .bind(&message.text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(archived)
    }
}
