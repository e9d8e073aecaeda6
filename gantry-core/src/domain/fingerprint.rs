//! Entity fingerprints for optimistic concurrency

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use super::pipeline::Pipeline;

/// Opaque version token of a persisted entity
///
/// Callers obtain it from a read and hand it back with an update or delete;
/// the engine only ever compares tokens for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Hex SHA-256 of the pipeline's JSON encoding
    pub fn of(pipeline: &Pipeline) -> Self {
        let mut hasher = Sha256::new();
        // Serializing plain owned data into a Vec cannot fail
        let bytes = serde_json::to_vec(pipeline).unwrap_or_default();
        hasher.update(&bytes);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
