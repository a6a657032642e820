//! Persisted shapes of encrypted columns.

use serde::{Deserialize, Serialize};

use crate::cipher::{NONCE_SIZE, TAG_SIZE};
use crate::error::CryptoError;
use crate::hash::SearchHash;

/// An encrypted column value: the IV and the ciphertext with its GCM tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedField {
    /// Per-encryption random IV.
    pub iv: [u8; NONCE_SIZE],
    /// Ciphertext followed by the authentication tag.
    pub ciphertext: Vec<u8>,
}

impl EncryptedField {
    /// Serialize as `IV ‖ ciphertext ‖ tag` for a single `BYTEA` column.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(NONCE_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Split stored bytes into IV and ciphertext.
    ///
    /// Input shorter than an IV plus a tag cannot be authentic and is
    /// rejected as an integrity failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::Integrity);
        }
        let (iv_bytes, ciphertext) = bytes.split_at(NONCE_SIZE);
        let mut iv = [0u8; NONCE_SIZE];
        iv.copy_from_slice(iv_bytes);
        Ok(Self {
            iv,
            ciphertext: ciphertext.to_vec(),
        })
    }
}

/// A searchable column: ciphertext stored side by side with its search hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableField {
    /// The encrypted value.
    pub encrypted: EncryptedField,
    /// Deterministic digest of the plaintext for equality lookup.
    pub search_hash: SearchHash,
}
