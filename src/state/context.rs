//! Per-user registration context
//!
//! Tracks a single user's progress through the conversational registration
//! flow. The context is transient: it lives only in the bot process and is
//! lost on restart, which is acceptable because it only buffers an
//! in-progress registration.

use chrono::{DateTime, Utc};

/// Step within the registration flow.
///
/// The absence of a context entry is the idle state; an entry only ever
/// exists while a nickname is awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    AwaitingNickname,
}

/// Transient conversation state for one Telegram user.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationContext {
    /// Telegram user id this context belongs to
    pub user_id: i64,
    /// Current step of the flow
    pub step: RegistrationStep,
    /// Shared-chat snapshot computed when the flow started
    pub common_chats: Vec<i64>,
    /// When the flow started
    pub started_at: DateTime<Utc>,
}

impl RegistrationContext {
    pub fn new(user_id: i64, common_chats: Vec<i64>) -> Self {
        Self {
            user_id,
            step: RegistrationStep::AwaitingNickname,
            common_chats,
            started_at: Utc::now(),
        }
    }
}
