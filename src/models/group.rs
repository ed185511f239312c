//! Group model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Snapshot of one administrator taken during a `/group` sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: i64,
    pub username: String,
    pub full_name: String,
}

/// A synced group chat.
///
/// `members` is fully replaced on every sync; it is a snapshot, not an
/// incrementally maintained list.
#[derive(Debug, Clone, FromRow)]
pub struct Group {
    pub chat_id: i64,
    pub title: String,
    pub members: Json<Vec<GroupMember>>,
    pub updated_at: DateTime<Utc>,
}
