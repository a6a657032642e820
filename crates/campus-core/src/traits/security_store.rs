//! Key-value contract for short-lived security state.

use std::time::Duration;

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for the distributed security state store (Redis or in-memory).
///
/// Holds lockout counters and flags, refresh-token registrations and
/// revocation entries. Every key written through this trait carries an
/// explicit TTL; there is no way to write an unbounded entry. Each method
/// is a single atomic call against the backend.
#[async_trait]
pub trait SecurityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value with a TTL, replacing any existing value.
    ///
    /// A zero TTL is a no-op: nothing is written and no error is raised.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Atomically increment an integer counter by 1 and return the new value.
    ///
    /// When the increment creates the key, `ttl` is applied in the same
    /// round-trip. An existing key keeps its remaining TTL.
    async fn increment(&self, key: &str, ttl: Duration) -> AppResult<i64>;

    /// Set the TTL on an existing key. Returns `false` if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Remaining lifetime of a key, or `None` if it does not exist.
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
