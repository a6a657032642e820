//! AES-256-GCM field cipher.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

use campus_core::config::CryptoConfig;

use crate::error::CryptoError;
use crate::field::{EncryptedField, SearchableField};
use crate::hash::search_hash;

/// Key size for AES-256 (32 bytes / 256 bits).
pub const KEY_SIZE: usize = 32;

/// Nonce size for AES-256-GCM (12 bytes / 96 bits).
pub const NONCE_SIZE: usize = 12;

/// Authentication tag size appended by GCM.
pub const TAG_SIZE: usize = 16;

/// Encrypts and decrypts individual column values.
///
/// Built once from configuration and shared read-only for the process
/// lifetime. Every encryption draws a fresh random IV from the OS RNG.
#[derive(Clone)]
pub struct FieldCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

impl FieldCipher {
    /// Create a cipher from raw key bytes. The key must be exactly 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_SIZE {
            return Err(CryptoError::InvalidInput(format!(
                "field key must be exactly {KEY_SIZE} bytes, got {}",
                key.len()
            )));
        }
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CryptoError::Internal(format!("cipher init failed: {e}")))?;
        Ok(Self { cipher })
    }

    /// Create a cipher from the base64 `crypto.field_key` setting.
    pub fn from_config(config: &CryptoConfig) -> Result<Self, CryptoError> {
        let key = STANDARD
            .decode(config.field_key.trim())
            .map_err(|e| CryptoError::InvalidInput(format!("field key is not base64: {e}")))?;
        Self::new(&key)
    }

    /// Draw a fresh random key from the OS RNG.
    pub fn generate_key() -> [u8; KEY_SIZE] {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        let mut out = [0u8; KEY_SIZE];
        out.copy_from_slice(key.as_slice());
        out
    }

    /// Encrypt a plaintext into its `IV ‖ ciphertext ‖ tag` byte form.
    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>, CryptoError> {
        Ok(self.seal(plaintext)?.to_bytes())
    }

    /// Decrypt bytes produced by [`encrypt`](Self::encrypt).
    ///
    /// Fails closed with [`CryptoError::Integrity`] on any tampering or
    /// undersized input; altered plaintext is never returned.
    pub fn decrypt(&self, bytes: &[u8]) -> Result<String, CryptoError> {
        let field = EncryptedField::from_bytes(bytes)?;
        self.open(&field)
    }

    /// Encrypt a plaintext into an [`EncryptedField`].
    pub fn seal(&self, plaintext: &str) -> Result<EncryptedField, CryptoError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| CryptoError::Internal(format!("encryption failed: {e}")))?;

        let mut iv = [0u8; NONCE_SIZE];
        iv.copy_from_slice(nonce.as_slice());
        Ok(EncryptedField { iv, ciphertext })
    }

    /// Decrypt an [`EncryptedField`] back to its plaintext.
    pub fn open(&self, field: &EncryptedField) -> Result<String, CryptoError> {
        if field.ciphertext.len() < TAG_SIZE {
            debug!(len = field.ciphertext.len(), "Ciphertext shorter than the tag");
            return Err(CryptoError::Integrity);
        }
        let nonce = Nonce::from_slice(&field.iv);
        let plaintext = self
            .cipher
            .decrypt(nonce, field.ciphertext.as_slice())
            .map_err(|_| {
                debug!("Field authentication tag did not verify");
                CryptoError::Integrity
            })?;
        String::from_utf8(plaintext).map_err(|_| {
            debug!("Decrypted field is not valid UTF-8");
            CryptoError::Integrity
        })
    }

    /// Encrypt a value and pair it with its search hash.
    pub fn seal_searchable(&self, plaintext: &str) -> Result<SearchableField, CryptoError> {
        Ok(SearchableField {
            encrypted: self.seal(plaintext)?,
            search_hash: search_hash(plaintext),
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> FieldCipher {
        FieldCipher::new(&[7u8; KEY_SIZE]).unwrap()
    }

    #[test]
    fn test_generated_keys_are_usable_and_distinct() {
        let a = FieldCipher::generate_key();
        assert_ne!(a, FieldCipher::generate_key());
        let c = FieldCipher::new(&a).unwrap();
        assert_eq!(c.decrypt(&c.encrypt("x").unwrap()).unwrap(), "x");
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let c = cipher();
        for plaintext in ["", "Jane Doe", "guardian+1@example.org", "Żółć 学生 🎓"] {
            let bytes = c.encrypt(plaintext).unwrap();
            assert_eq!(c.decrypt(&bytes).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_output_layout() {
        let bytes = cipher().encrypt("abc").unwrap();
        assert_eq!(bytes.len(), NONCE_SIZE + 3 + TAG_SIZE);
    }

    #[test]
    fn test_iv_unique_per_call() {
        let c = cipher();
        let a = c.encrypt("same plaintext").unwrap();
        let b = c.encrypt("same plaintext").unwrap();
        assert_ne!(a, b);
        assert_ne!(a[..NONCE_SIZE], b[..NONCE_SIZE]);
    }

    #[test]
    fn test_any_tampered_byte_fails_integrity() {
        let c = cipher();
        let bytes = c.encrypt("555-0100").unwrap();
        for i in 0..bytes.len() {
            let mut tampered = bytes.clone();
            tampered[i] ^= 0x01;
            assert_eq!(
                c.decrypt(&tampered),
                Err(CryptoError::Integrity),
                "byte {i} was not authenticated"
            );
        }
    }

    #[test]
    fn test_undersized_input_fails_integrity() {
        let c = cipher();
        assert_eq!(c.decrypt(&[]), Err(CryptoError::Integrity));
        assert_eq!(c.decrypt(&[0u8; NONCE_SIZE]), Err(CryptoError::Integrity));
        assert_eq!(
            c.decrypt(&[0u8; NONCE_SIZE + TAG_SIZE - 1]),
            Err(CryptoError::Integrity)
        );
    }

    #[test]
    fn test_wrong_key_fails_integrity() {
        let bytes = cipher().encrypt("secret").unwrap();
        let other = FieldCipher::new(&[9u8; KEY_SIZE]).unwrap();
        assert_eq!(other.decrypt(&bytes), Err(CryptoError::Integrity));
    }

    #[test]
    fn test_non_utf8_plaintext_fails_integrity() {
        let c = cipher();
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = c.cipher.encrypt(&nonce, [0xffu8, 0xfe].as_slice()).unwrap();
        let mut iv = [0u8; NONCE_SIZE];
        iv.copy_from_slice(nonce.as_slice());
        let field = EncryptedField { iv, ciphertext };
        assert_eq!(c.open(&field), Err(CryptoError::Integrity));
    }

    #[test]
    fn test_key_length_enforced() {
        assert!(matches!(
            FieldCipher::new(&[0u8; 16]),
            Err(CryptoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let config = CryptoConfig {
            field_key: STANDARD.encode([1u8; KEY_SIZE]),
        };
        let c = FieldCipher::from_config(&config).unwrap();
        let bytes = c.encrypt("x").unwrap();
        assert_eq!(c.decrypt(&bytes).unwrap(), "x");

        let bad = CryptoConfig {
            field_key: "not base64!".to_string(),
        };
        assert!(matches!(
            FieldCipher::from_config(&bad),
            Err(CryptoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_seal_searchable_pairs_hash() {
        let c = cipher();
        let a = c.seal_searchable("S-1024").unwrap();
        let b = c.seal_searchable("S-1024").unwrap();
        assert_eq!(a.search_hash, b.search_hash);
        assert_ne!(a.encrypted, b.encrypted);
        assert_eq!(c.open(&a.encrypted).unwrap(), "S-1024");
    }
}
