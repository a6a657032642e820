//! Field encryption configuration.

use serde::{Deserialize, Serialize};

/// Key material for PII column encryption.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CryptoConfig {
    /// Base64 encoding of exactly 32 raw key bytes (AES-256).
    #[serde(default)]
    pub field_key: String,
}

impl std::fmt::Debug for CryptoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoConfig")
            .field("field_key", &"****")
            .finish()
    }
}
