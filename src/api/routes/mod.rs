//! Versioned route handlers

pub mod create_user;
pub mod reset_key;
