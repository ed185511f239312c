//! In-memory conversation state storage
//!
//! Registration contexts are keyed by Telegram user id in a concurrent map.
//! The map is the single shared mutable resource between update handlers;
//! dashmap's per-shard locking gives the at-most-one-writer-per-key
//! discipline the flow needs without an explicit lock around each entry.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::context::RegistrationContext;

/// Concurrent storage for per-user registration contexts.
#[derive(Debug, Clone, Default)]
pub struct StateStorage {
    contexts: Arc<DashMap<i64, RegistrationContext>>,
}

impl StateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save (or replace) the context for a user.
    pub fn save_context(&self, context: RegistrationContext) {
        debug!(user_id = context.user_id, step = ?context.step, "Saving registration context");
        self.contexts.insert(context.user_id, context);
    }

    /// Load a copy of the user's context, if a flow is in progress.
    pub fn load_context(&self, user_id: i64) -> Option<RegistrationContext> {
        self.contexts.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Discard the user's context; returns whether one existed.
    pub fn delete_context(&self, user_id: i64) -> bool {
        let removed = self.contexts.remove(&user_id).is_some();
        if removed {
            debug!(user_id = user_id, "Deleted registration context");
        }
        removed
    }

    /// Check whether a flow is in progress for the user.
    pub fn context_exists(&self, user_id: i64) -> bool {
        self.contexts.contains_key(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::context::RegistrationStep;

    #[test]
    fn start_creates_awaiting_nickname_entry() {
        let storage = StateStorage::new();
        storage.save_context(RegistrationContext::new(123, vec![-100, -200]));

        let context = storage.load_context(123).expect("context should exist");
        assert_eq!(context.step, RegistrationStep::AwaitingNickname);
        assert_eq!(context.common_chats, vec![-100, -200]);
    }

    #[test]
    fn absent_entry_means_idle() {
        let storage = StateStorage::new();
        assert!(!storage.context_exists(42));
        assert!(storage.load_context(42).is_none());
    }

    #[test]
    fn delete_clears_the_flow() {
        let storage = StateStorage::new();
        storage.save_context(RegistrationContext::new(7, vec![]));

        assert!(storage.delete_context(7));
        assert!(!storage.context_exists(7));
        // A second delete is a no-op
        assert!(!storage.delete_context(7));
    }

    #[test]
    fn save_replaces_existing_entry() {
        let storage = StateStorage::new();
        storage.save_context(RegistrationContext::new(9, vec![-1]));
        storage.save_context(RegistrationContext::new(9, vec![-2]));

        let context = storage.load_context(9).expect("context should exist");
        assert_eq!(context.common_chats, vec![-2]);
    }
}
