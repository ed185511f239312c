//! Bot update handlers

pub mod commands;
pub mod messages;
