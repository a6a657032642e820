//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod auth;
pub mod crypto;
pub mod database;
pub mod logging;
pub mod store;

use serde::{Deserialize, Serialize};

pub use self::auth::AuthConfig;
pub use self::crypto::CryptoConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Security state store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Token and lockout settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Field encryption settings.
    #[serde(default)]
    pub crypto: CryptoConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the named environment.
    ///
    /// Merges `config/default.toml`, the environment overlay
    /// `config/{env}.toml`, and environment variables prefixed with `CAMPUS__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::build(
            config::Config::builder()
                .add_source(config::File::with_name("config/default").required(false))
                .add_source(config::File::with_name(&format!("config/{env}")).required(false)),
        )
    }

    /// Load configuration from an explicit file, still honouring `CAMPUS__` overrides.
    pub fn load_from(path: &str) -> Result<Self, AppError> {
        Self::build(config::Config::builder().add_source(config::File::with_name(path)))
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, AppError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix("CAMPUS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_policy() {
        let config = AppConfig::default();
        assert_eq!(config.auth.max_failed_attempts, 5);
        assert_eq!(config.auth.lockout_duration_ms, 1_800_000);
        assert_eq!(config.auth.attempt_window_ms, 3_600_000);
        assert_eq!(config.auth.access_token_ttl_ms, 900_000);
        assert_eq!(config.auth.refresh_token_ttl_ms, 604_800_000);
        assert_eq!(config.store.provider, "memory");
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let parsed: AppConfig = serde_json::from_str(r#"{"auth": {"jwt_issuer": "school"}}"#)
            .expect("partial config should deserialize");
        assert_eq!(parsed.auth.jwt_issuer, "school");
        assert_eq!(parsed.auth.max_failed_attempts, 5);
        assert_eq!(parsed.logging.level, "info");
    }
}
