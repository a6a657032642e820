//! Redis security store implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use campus_core::error::{AppError, ErrorKind};
use campus_core::result::AppResult;
use campus_core::traits::SecurityStore;

use super::client::RedisClient;

/// Lua script for an atomic counter increment with TTL-on-create.
///
/// KEYS[1] = counter key
/// ARGV[1] = TTL in milliseconds, applied only when the increment creates the key
///
/// Returns the new counter value.
const INCREMENT_SCRIPT: &str = r#"
    local value = redis.call('INCR', KEYS[1])
    if value == 1 then
        redis.call('PEXPIRE', KEYS[1], ARGV[1])
    end
    return value
"#;

/// Redis-backed security store, shared by every application node.
#[derive(Debug, Clone)]
pub struct RedisSecurityStore {
    /// Redis client.
    client: RedisClient,
    /// Preloaded increment script.
    increment_script: redis::Script,
}

impl RedisSecurityStore {
    /// Create a new Redis security store.
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            increment_script: redis::Script::new(INCREMENT_SCRIPT),
        }
    }

    /// Map a Redis error to an AppError, separating connectivity from command failures.
    fn map_err(e: redis::RedisError) -> AppError {
        let kind = if e.is_io_error() || e.is_connection_dropped() || e.is_timeout() {
            ErrorKind::ServiceUnavailable
        } else {
            ErrorKind::Cache
        };
        AppError::with_source(kind, format!("Redis error: {e}"), e)
    }
}

/// Milliseconds of a TTL, clamped to at least 1 so Redis never sees `PX 0`.
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[async_trait]
impl SecurityStore for RedisSecurityStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        if ttl.is_zero() {
            debug!(key, "Skipping store write with zero TTL");
            return Ok(());
        }
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .pset_ex(&full_key, value, ttl_millis(ttl))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn increment(&self, key: &str, ttl: Duration) -> AppResult<i64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let value: i64 = self
            .increment_script
            .key(&full_key)
            .arg(ttl_millis(ttl))
            .invoke_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(value)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let result: bool = conn
            .pexpire(&full_key, millis)
            .await
            .map_err(Self::map_err)?;
        Ok(result)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: bool = conn.exists(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        // -2 = missing, -1 = no expiry (never written by this store)
        let millis: i64 = conn.pttl(&full_key).await.map_err(Self::map_err)?;
        Ok(match millis {
            -2 => None,
            m if m < 0 => Some(Duration::MAX),
            m => Some(Duration::from_millis(m.unsigned_abs())),
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
