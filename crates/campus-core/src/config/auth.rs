//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Token lifetimes, signing material and lockout policy.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base64-encoded HMAC-SHA256 signing secret. Must decode to at least 32 bytes.
    #[serde(default)]
    pub jwt_secret: String,
    /// Value of the `iss` claim on issued tokens; verified on every token.
    #[serde(default = "default_issuer")]
    pub jwt_issuer: String,
    /// Access token lifetime in milliseconds.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_ms: u64,
    /// Refresh token lifetime in milliseconds.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_ms: u64,
    /// Consecutive failed attempts that promote to a lockout.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: u32,
    /// Lockout duration in milliseconds.
    #[serde(default = "default_lockout")]
    pub lockout_duration_ms: u64,
    /// Lifetime of the failed-attempt counter in milliseconds.
    #[serde(default = "default_attempt_window")]
    pub attempt_window_ms: u64,
    /// Minimum password length for credential changes.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"****")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("access_token_ttl_ms", &self.access_token_ttl_ms)
            .field("refresh_token_ttl_ms", &self.refresh_token_ttl_ms)
            .field("max_failed_attempts", &self.max_failed_attempts)
            .field("lockout_duration_ms", &self.lockout_duration_ms)
            .field("attempt_window_ms", &self.attempt_window_ms)
            .field("password_min_length", &self.password_min_length)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_issuer: default_issuer(),
            access_token_ttl_ms: default_access_ttl(),
            refresh_token_ttl_ms: default_refresh_ttl(),
            max_failed_attempts: default_max_failed(),
            lockout_duration_ms: default_lockout(),
            attempt_window_ms: default_attempt_window(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_issuer() -> String {
    "campus".to_string()
}

fn default_access_ttl() -> u64 {
    900_000
}

fn default_refresh_ttl() -> u64 {
    604_800_000
}

fn default_max_failed() -> u32 {
    5
}

fn default_lockout() -> u64 {
    1_800_000
}

fn default_attempt_window() -> u64 {
    3_600_000
}

fn default_password_min() -> usize {
    8
}
