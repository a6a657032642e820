//! Deterministic search hash for equality lookups over encrypted columns.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of a plaintext. Always 64 characters.
///
/// A pure function of the plaintext alone; there is no per-record salt,
/// so equal plaintexts always produce equal hashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHash(String);

impl SearchHash {
    /// Length of the hex digest.
    pub const LEN: usize = 64;

    /// Return the digest as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the search hash of a plaintext.
pub fn search_hash(plaintext: &str) -> SearchHash {
    let digest = Sha256::digest(plaintext.as_bytes());
    SearchHash(hex::encode(digest))
}
