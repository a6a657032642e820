//! Store manager that dispatches to the configured provider.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info};

use campus_core::config::store::StoreConfig;
use campus_core::error::AppError;
use campus_core::result::AppResult;
use campus_core::traits::SecurityStore;

/// Security store wrapper that bounds every call with a timeout.
///
/// A slow or unreachable backend surfaces as a `ServiceUnavailable`
/// error instead of hanging the request.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store provider.
    inner: Arc<dyn SecurityStore>,
    /// Upper bound for a single round-trip.
    timeout: Duration,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn SecurityStore> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis security store");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisSecurityStore::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory security store");
                Arc::new(crate::memory::MemorySecurityStore::new(&config.memory))
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self {
            inner,
            timeout: Duration::from_millis(config.operation_timeout_ms),
        })
    }

    /// Create a store manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn SecurityStore>, timeout: Duration) -> Self {
        Self {
            inner: provider,
            timeout,
        }
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = AppResult<T>> + Send,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    op,
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Security store call timed out"
                );
                Err(AppError::service_unavailable(format!(
                    "Security store '{op}' timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

#[async_trait]
impl SecurityStore for StoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.bounded("get", self.inner.get(key)).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.bounded("set", self.inner.set(key, value, ttl)).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.bounded("delete", self.inner.delete(key)).await
    }

    async fn increment(&self, key: &str, ttl: Duration) -> AppResult<i64> {
        self.bounded("increment", self.inner.increment(key, ttl))
            .await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        self.bounded("expire", self.inner.expire(key, ttl)).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.bounded("exists", self.inner.exists(key)).await
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        self.bounded("ttl", self.inner.ttl(key)).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.bounded("health_check", self.inner.health_check())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::error::ErrorKind;

    /// A backend that never answers.
    #[derive(Debug)]
    struct StalledStore;

    #[async_trait]
    impl SecurityStore for StalledStore {
        async fn get(&self, _key: &str) -> AppResult<Option<String>> {
            std::future::pending().await
        }
        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> AppResult<()> {
            std::future::pending().await
        }
        async fn delete(&self, _key: &str) -> AppResult<()> {
            std::future::pending().await
        }
        async fn increment(&self, _key: &str, _ttl: Duration) -> AppResult<i64> {
            std::future::pending().await
        }
        async fn expire(&self, _key: &str, _ttl: Duration) -> AppResult<bool> {
            std::future::pending().await
        }
        async fn exists(&self, _key: &str) -> AppResult<bool> {
            std::future::pending().await
        }
        async fn ttl(&self, _key: &str) -> AppResult<Option<Duration>> {
            std::future::pending().await
        }
        async fn health_check(&self) -> AppResult<bool> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_backend_times_out_as_unavailable() {
        let manager = StoreManager::from_provider(Arc::new(StalledStore), Duration::from_secs(2));
        let err = manager
            .increment("auth:attempts:1", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ServiceUnavailable);
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_memory_provider_from_config() {
        let manager = StoreManager::new(&StoreConfig::default()).await.unwrap();
        manager
            .set("k", "v", Duration::from_secs(10))
            .await
            .unwrap();
        assert_eq!(manager.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = StoreConfig {
            provider: "etcd".to_string(),
            ..StoreConfig::default()
        };
        let err = StoreManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
