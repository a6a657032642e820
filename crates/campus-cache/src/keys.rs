//! Key builders for every entry the trust layer writes.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses. The Redis provider adds its
//! configured prefix on top of these.

// ── Lockout keys ───────────────────────────────────────────

/// Failed-attempt counter for a principal.
pub fn failed_attempts(principal_id: i64) -> String {
    format!("auth:attempts:{principal_id}")
}

/// Lockout flag for a principal.
pub fn lockout(principal_id: i64) -> String {
    format!("auth:locked:{principal_id}")
}

// ── Token keys ─────────────────────────────────────────────

/// The single live refresh token registered for a principal.
pub fn refresh_registration(principal_id: i64) -> String {
    format!("auth:refresh:{principal_id}")
}

/// Revocation entry, keyed by the literal token value.
pub fn revoked_token(token: &str) -> String {
    format!("auth:revoked:{token}")
}
