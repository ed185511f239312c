//! Bot command handlers

pub mod group;
pub mod reset_key;
pub mod start;
pub mod update;
