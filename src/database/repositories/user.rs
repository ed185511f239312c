//! User repository implementation

use sqlx::PgPool;

use crate::models::user::User;
use crate::utils::errors::AvangardError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Allocate the next sequential user id.
    ///
    /// Returns `max(id) + 1`, or 1 for an empty table. The check-then-insert
    /// is not transactional; the unique constraints on the table are what
    /// actually protect against a racing allocation.
    pub async fn next_id(&self) -> Result<i64, AvangardError> {
        let id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) + 1 FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    /// Find user by Telegram ID
    pub async fn find_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> Result<Option<User>, AvangardError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, telegram_id, nickname, chats, key_hash, created_at FROM users WHERE telegram_id = $1"
        )
        .bind(telegram_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Check whether any stored user already carries this key digest
    pub async fn key_hash_exists(&self, key_hash: &str) -> Result<bool, AvangardError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE key_hash = $1)")
                .bind(key_hash)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    /// Insert a fully populated user row
    pub async fn insert(&self, user: &User) -> Result<(), AvangardError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, telegram_id, nickname, chats, key_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id)
        .bind(user.telegram_id)
        .bind(&user.nickname)
        .bind(&user.chats)
        .bind(&user.key_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Replace the user's shared-chat list; returns whether a row changed
    pub async fn update_chats(
        &self,
        telegram_id: i64,
        chats: &[i64],
    ) -> Result<bool, AvangardError> {
        let result = sqlx::query("UPDATE users SET chats = $2 WHERE telegram_id = $1")
            .bind(telegram_id)
            .bind(chats)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the user's key digest; returns whether a row changed
    pub async fn update_key_hash(
        &self,
        telegram_id: i64,
        key_hash: &str,
    ) -> Result<bool, AvangardError> {
        let result = sqlx::query("UPDATE users SET key_hash = $2 WHERE telegram_id = $1")
            .bind(telegram_id)
            .bind(key_hash)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
