//! Data models

pub mod group;
pub mod message;
pub mod user;

pub use group::{Group, GroupMember};
pub use message::{ArchivedMessage, NewMessage};
pub use user::{CreateUserRequest, User};
