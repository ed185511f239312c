//! Avangard Telegram Bot
//!
//! Registers Telegram users into a Postgres-backed store and issues each of
//! them a secret access key. Two runtimes share the store: an HTTP API with
//! an X-API-Key credential contract and a bot driving a per-user
//! conversational registration flow.

pub mod api;
pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AvangardError, Result};

pub use services::ServiceFactory;
pub use state::StateStorage;
