//! Utility modules

pub mod errors;
pub mod hash;
pub mod logging;

pub use errors::{AvangardError, Result};
pub use hash::KeyHasher;
