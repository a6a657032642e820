//! Token signing.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use crate::error::TokenError;

use super::claims::{Claims, TokenType};

/// Signs HS256 tokens.
///
/// Without a key every call to [`JwtEncoder::sign`] fails with
/// [`TokenError::SigningKeyUnavailable`].
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: Option<EncodingKey>,
    issuer: String,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("has_key", &self.encoding_key.is_some())
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates an encoder from raw secret bytes, or a disabled one when `None`.
    pub fn new(secret: Option<&[u8]>, issuer: impl Into<String>) -> Self {
        Self {
            encoding_key: secret.map(EncodingKey::from_secret),
            issuer: issuer.into(),
        }
    }

    /// Builds claims for `subject` expiring `ttl` from now and signs them.
    ///
    /// `exp` is floored to whole seconds.
    pub fn sign(
        &self,
        subject: &str,
        user_id: Option<i64>,
        authorities: &[String],
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<(String, Claims), TokenError> {
        let key = self
            .encoding_key
            .as_ref()
            .ok_or(TokenError::SigningKeyUnavailable)?;

        let now_ms = Utc::now().timestamp_millis();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: subject.to_string(),
            uid: user_id,
            authorities: authorities.to_vec(),
            iat: now_ms.div_euclid(1000),
            exp: now_ms.saturating_add(ttl_ms).div_euclid(1000),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;
        Ok((token, claims))
    }
}
