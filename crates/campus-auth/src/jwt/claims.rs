//! Claims carried by access and refresh tokens.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Signed token payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the principal's login.
    pub sub: String,
    /// Principal identifier, when known at issuance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    /// Role and permission strings granted at issuance.
    #[serde(default)]
    pub authorities: Vec<String>,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
    /// Issuing service.
    pub iss: String,
    /// Unique token identifier. Keeps two tokens minted in the same second distinct.
    pub jti: String,
    /// Access or refresh.
    pub token_type: TokenType,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented on each request.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

impl Claims {
    /// Expiration in milliseconds since epoch.
    pub fn expires_at_ms(&self) -> i64 {
        self.exp.saturating_mul(1000)
    }

    /// Whether the token is expired at `now_ms` (milliseconds since epoch).
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at_ms()
    }

    /// Lifetime left at `now_ms`, zero once expired.
    pub fn remaining_at(&self, now_ms: i64) -> Duration {
        let left = self.expires_at_ms().saturating_sub(now_ms);
        Duration::from_millis(u64::try_from(left).unwrap_or(0))
    }

    /// Lifetime left now.
    pub fn remaining(&self) -> Duration {
        self.remaining_at(Utc::now().timestamp_millis())
    }

    /// Whether the authorities include `authority`.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(exp: i64) -> Claims {
        Claims {
            sub: "alice".to_string(),
            uid: Some(7),
            authorities: vec!["ROLE_TEACHER".to_string(), "class:read".to_string()],
            iat: exp - 60,
            exp,
            iss: "campus".to_string(),
            jti: "j1".to_string(),
            token_type: TokenType::Access,
        }
    }

    #[test]
    fn test_expiry_is_inclusive_at_millisecond_precision() {
        let c = claims(1_000);
        assert!(!c.is_expired_at(999_999));
        assert!(c.is_expired_at(1_000_000));
        assert!(c.is_expired_at(1_000_001));
    }

    #[test]
    fn test_remaining_saturates_at_zero() {
        let c = claims(1_000);
        assert_eq!(c.remaining_at(999_750), Duration::from_millis(250));
        assert_eq!(c.remaining_at(2_000_000), Duration::ZERO);
    }

    #[test]
    fn test_token_type_wire_format() {
        let json = serde_json::to_value(claims(10)).unwrap();
        assert_eq!(json["token_type"], "access");
        assert_eq!(json["uid"], 7);
    }

    #[test]
    fn test_absent_uid_is_omitted() {
        let mut c = claims(10);
        c.uid = None;
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("uid").is_none());
        assert!(c.has_authority("class:read"));
        assert!(!c.has_authority("fee:write"));
    }
}
