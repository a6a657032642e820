//! Facade over the encoder and decoder built from configuration.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, error, info};

use campus_core::config::AuthConfig;

use crate::error::TokenError;

use super::claims::{Claims, TokenType};
use super::decoder::JwtDecoder;
use super::encoder::JwtEncoder;

/// Minimum decoded length of the signing secret.
pub const MIN_SECRET_BYTES: usize = 32;

/// A freshly signed token and the claims inside it.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact serialized token.
    pub value: String,
    /// Claims that were signed.
    pub claims: Claims,
}

/// Issues and verifies bearer tokens.
///
/// Construction never fails. When the configured secret is absent, not
/// valid base64, or shorter than [`MIN_SECRET_BYTES`], the codec logs an
/// error once and then refuses every issue and every verification.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
}

impl TokenCodec {
    /// Builds the codec from auth configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = match decode_secret(&config.jwt_secret) {
            Ok(secret) => {
                info!(issuer = %config.jwt_issuer, "Token signing key loaded");
                Some(secret)
            }
            Err(reason) => {
                error!(
                    reason,
                    "Token signing key unavailable; all token operations will be refused"
                );
                None
            }
        };
        Self::from_secret(secret.as_deref(), &config.jwt_issuer)
    }

    /// Builds the codec from raw secret bytes.
    pub fn from_secret(secret: Option<&[u8]>, issuer: &str) -> Self {
        Self {
            encoder: JwtEncoder::new(secret, issuer),
            decoder: JwtDecoder::new(secret, issuer),
        }
    }

    /// Signs a new token.
    pub fn issue(
        &self,
        subject: &str,
        user_id: Option<i64>,
        authorities: &[String],
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<IssuedToken, TokenError> {
        let (value, claims) = self
            .encoder
            .sign(subject, user_id, authorities, token_type, ttl)?;
        Ok(IssuedToken { value, claims })
    }

    /// Verifies a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.decoder.verify(token)
    }

    /// Claims of a valid token, or `None` for any failure.
    pub fn claims(&self, token: &str) -> Option<Claims> {
        match self.verify(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(cause = %e, "Token rejected");
                None
            }
        }
    }

    /// Whether the token verifies.
    pub fn is_valid(&self, token: &str) -> bool {
        self.verify(token).is_ok()
    }
}

fn decode_secret(encoded: &str) -> Result<Vec<u8>, &'static str> {
    if encoded.trim().is_empty() {
        return Err("secret is not configured");
    }
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|_| "secret is not valid base64")?;
    if bytes.len() < MIN_SECRET_BYTES {
        return Err("secret decodes to fewer than 32 bytes");
    }
    Ok(bytes)
}
