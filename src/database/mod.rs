//! Database layer

pub mod connection;
pub mod repositories;

pub use connection::{create_pool, run_migrations, DatabasePool};
