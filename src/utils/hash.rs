//! Access-key hashing
//!
//! Raw access keys are never stored; only a peppered SHA-256 digest is
//! persisted and compared. The digest must be deterministic so the key
//! generator can probe storage for collisions before accepting a candidate.

use sha2::{Digest, Sha256};

/// One-way hasher for access keys.
#[derive(Debug, Clone)]
pub struct KeyHasher {
    pepper: String,
}

impl KeyHasher {
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }

    /// Hash a raw key into the hex digest stored in the `key_hash` column.
    pub fn hash(&self, raw: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.pepper.as_bytes());
        hasher.update(b"|");
        hasher.update(raw.as_bytes());
        hex::encode(hasher.finalize())
    }
}
