//! Token verification.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::error::TokenError;

use super::claims::Claims;

/// Verifies HS256 tokens against a fixed issuer.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("has_key", &self.decoding_key.is_some())
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a decoder from raw secret bytes, or a disabled one when `None`.
    pub fn new(secret: Option<&[u8]>, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            decoding_key: secret.map(DecodingKey::from_secret),
            validation,
        }
    }

    /// Checks signature, algorithm, issuer and expiry, returning the claims.
    ///
    /// Expiry is compared at millisecond precision on top of the library's
    /// whole-second check, so a token is rejected from the instant
    /// `now >= exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let key = self
            .decoding_key
            .as_ref()
            .ok_or(TokenError::SigningKeyUnavailable)?;

        let data = decode::<Claims>(token, key, &self.validation).map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            JwtErrorKind::InvalidSignature => TokenError::BadSignature,
            JwtErrorKind::InvalidAlgorithm | JwtErrorKind::InvalidAlgorithmName => {
                TokenError::UnsupportedAlgorithm
            }
            JwtErrorKind::InvalidIssuer => TokenError::WrongIssuer,
            _ => TokenError::Malformed,
        })?;

        if data.claims.is_expired_at(Utc::now().timestamp_millis()) {
            return Err(TokenError::Expired);
        }
        Ok(data.claims)
    }
}
