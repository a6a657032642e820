//! Security state store configuration.

use serde::{Deserialize, Serialize};

/// Top-level store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store provider type: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Upper bound for a single store round-trip in milliseconds.
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_ms: u64,
    /// Redis-specific configuration.
    #[serde(default)]
    pub redis: RedisStoreConfig,
    /// In-memory store configuration.
    #[serde(default)]
    pub memory: MemoryStoreConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            operation_timeout_ms: default_operation_timeout(),
            redis: RedisStoreConfig::default(),
            memory: MemoryStoreConfig::default(),
        }
    }
}

/// Redis backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisStoreConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all Campus security keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisStoreConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

/// In-memory backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStoreConfig {
    /// Entry count above which a write triggers a sweep of expired entries.
    #[serde(default = "default_sweep_threshold")]
    pub sweep_threshold: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            sweep_threshold: default_sweep_threshold(),
        }
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_operation_timeout() -> u64 {
    2_000
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "campus:".to_string()
}

fn default_sweep_threshold() -> usize {
    10_000
}
