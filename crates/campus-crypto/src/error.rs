//! Errors raised by the field cipher.

use campus_core::error::{AppError, ErrorKind};
use thiserror::Error;

/// Failure of an encrypt, decrypt or key-loading call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Caller supplied unusable input (bad key material, malformed encoding).
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Ciphertext failed authentication or is too short to contain an IV and tag.
    #[error("ciphertext failed integrity verification")]
    Integrity,
    /// The cipher itself failed.
    #[error("cipher failure: {0}")]
    Internal(String),
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        let kind = match err {
            CryptoError::InvalidInput(_) => ErrorKind::Validation,
            CryptoError::Integrity | CryptoError::Internal(_) => ErrorKind::Crypto,
        };
        AppError::with_source(kind, err.to_string(), err)
    }
}
