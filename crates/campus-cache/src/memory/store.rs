//! In-memory security store backed by a sharded concurrent map.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use campus_core::config::store::MemoryStoreConfig;
use campus_core::error::AppError;
use campus_core::result::AppResult;
use campus_core::traits::SecurityStore;

/// A stored value and the instant it stops being visible.
#[derive(Debug, Clone)]
struct Slot {
    data: String,
    expires_at: Instant,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory security store.
///
/// Each entry carries its own deadline. Expired entries are invisible
/// immediately and are physically removed lazily on access, or in bulk
/// once the map grows past the configured sweep threshold.
#[derive(Debug, Clone)]
pub struct MemorySecurityStore {
    entries: Arc<DashMap<String, Slot>>,
    sweep_threshold: usize,
}

impl MemorySecurityStore {
    /// Create a new in-memory store from configuration.
    pub fn new(config: &MemoryStoreConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            sweep_threshold: config.sweep_threshold,
        }
    }

    /// Number of entries currently held, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, slot| !slot.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Purged expired security store entries");
        }
        removed
    }

    fn live(&self, key: &str) -> Option<Slot> {
        let now = Instant::now();
        let live = self
            .entries
            .get(key)
            .and_then(|slot| (!slot.is_expired(now)).then(|| slot.value().clone()));
        if live.is_none() {
            self.entries.remove_if(key, |_, slot| slot.is_expired(now));
        }
        live
    }

    fn maybe_sweep(&self) {
        if self.entries.len() > self.sweep_threshold {
            self.purge_expired();
        }
    }
}

#[async_trait]
impl SecurityStore for MemorySecurityStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live(key).map(|slot| slot.data))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        if ttl.is_zero() {
            return Ok(());
        }
        self.entries.insert(
            key.to_string(),
            Slot {
                data: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        self.maybe_sweep();
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn increment(&self, key: &str, ttl: Duration) -> AppResult<i64> {
        let next = {
            let now = Instant::now();
            let mut slot = self.entries.entry(key.to_string()).or_insert_with(|| Slot {
                data: "0".to_string(),
                expires_at: now + ttl,
            });
            if slot.is_expired(now) {
                *slot = Slot {
                    data: "0".to_string(),
                    expires_at: now + ttl,
                };
            }
            let current: i64 = slot
                .data
                .parse()
                .map_err(|_| AppError::cache(format!("Value at '{key}' is not an integer")))?;
            let next = current + 1;
            slot.data = next.to_string();
            next
        };
        self.maybe_sweep();
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let now = Instant::now();
        let found = match self.entries.get_mut(key) {
            Some(mut slot) if !slot.is_expired(now) => {
                slot.expires_at = now + ttl;
                true
            }
            _ => false,
        };
        if !found || ttl.is_zero() {
            self.entries.remove_if(key, |_, slot| slot.is_expired(now));
        }
        Ok(found)
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live(key).is_some())
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        Ok(self
            .live(key)
            .map(|slot| slot.expires_at.saturating_duration_since(Instant::now())))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
