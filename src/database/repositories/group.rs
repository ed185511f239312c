//! Group repository implementation

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::group::{Group, GroupMember};
use crate::utils::errors::AvangardError;

#[derive(Debug, Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or fully replace a group snapshot.
    ///
    /// Each sync is a complete overwrite of `members`, never a merge.
    /// Returns the stored row and whether it was newly created.
    pub async fn upsert(
        &self,
        chat_id: i64,
        title: &str,
        members: &[GroupMember],
    ) -> Result<(Group, bool), AvangardError> {
        // xmax = 0 only holds for freshly inserted rows
        let row: (i64, String, Json<Vec<GroupMember>>, DateTime<Utc>, bool) = sqlx::query_as(
            r#"
            INSERT INTO groups (chat_id, title, members, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (chat_id) DO UPDATE
            SET title = EXCLUDED.title,
                members = EXCLUDED.members,
                updated_at = EXCLUDED.updated_at
            RETURNING chat_id, title, members, updated_at, (xmax = 0)
            "#,
        )
        .bind(chat_id)
        .bind(title)
        .bind(Json(members))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        let (chat_id, title, members, updated_at, inserted) = row;
        let group = Group {
            chat_id,
            title,
            members,
            updated_at,
        };

        Ok((group, inserted))
    }

    /// Chat ids of every synced group whose administrator snapshot contains
    /// the given user, i.e. the common-chats lookup used at `/start`.
    pub async fn chats_for_member(&self, user_id: i64) -> Result<Vec<i64>, AvangardError> {
        let chats: Vec<i64> = sqlx::query_scalar(
            "SELECT chat_id FROM groups WHERE members @> $1 ORDER BY chat_id",
        )
        .bind(serde_json::json!([{ "user_id": user_id }]))
        .fetch_all(&self.pool)
        .await?;

        Ok(chats)
    }
}
