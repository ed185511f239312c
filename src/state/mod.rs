//! Conversation state management

pub mod context;
pub mod storage;

pub use context::{RegistrationContext, RegistrationStep};
pub use storage::StateStorage;
