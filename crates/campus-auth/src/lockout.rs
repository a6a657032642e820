//! Failed-attempt counting and account lockout.
//!
//! State lives in the shared security store so every node sees the same
//! counters: a per-principal counter with a sliding-window TTL applied on
//! its first increment, and a lock flag whose TTL is the lockout duration.
//! Reaching the threshold promotes the counter into the flag.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use campus_cache::StoreManager;
use campus_cache::keys;
use campus_core::config::AuthConfig;
use campus_core::result::AppResult;
use campus_core::traits::SecurityStore;

/// Observable lockout state of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockoutState {
    /// Not locked; `attempts` failures counted in the current window (zero when none).
    Unlocked {
        /// Failures so far.
        attempts: u32,
    },
    /// Locked until `remaining` has elapsed.
    Locked {
        /// Time until the lock lapses.
        remaining: Duration,
    },
}

/// Result of recording one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Counted, still below the threshold.
    Counted {
        /// Failures in the current window, including this one.
        attempts: u32,
    },
    /// This failure reached the threshold and locked the account.
    Locked {
        /// Lock duration.
        remaining: Duration,
    },
}

/// Lockout rules bound to a security store.
#[derive(Debug, Clone)]
pub struct LockoutPolicy {
    store: Arc<StoreManager>,
    max_attempts: u32,
    lockout_duration: Duration,
    attempt_window: Duration,
}

impl LockoutPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig, store: Arc<StoreManager>) -> Self {
        Self {
            store,
            max_attempts: config.max_failed_attempts.max(1),
            lockout_duration: Duration::from_millis(config.lockout_duration_ms),
            attempt_window: Duration::from_millis(config.attempt_window_ms),
        }
    }

    /// Remaining lock time, or `None` when the principal is not locked.
    pub async fn check(&self, principal_id: i64) -> AppResult<Option<Duration>> {
        self.store.ttl(&keys::lockout(principal_id)).await
    }

    /// Counts one failure, locking the principal when the threshold is reached.
    ///
    /// The increment is atomic in the store, so concurrent failures on
    /// different nodes are never lost.
    pub async fn record_failure(&self, principal_id: i64) -> AppResult<FailureOutcome> {
        let attempts_key = keys::failed_attempts(principal_id);
        let count = self
            .store
            .increment(&attempts_key, self.attempt_window)
            .await?;
        let attempts = u32::try_from(count).unwrap_or(u32::MAX);

        if attempts < self.max_attempts {
            warn!(principal_id, attempts, "Failed authentication attempt");
            return Ok(FailureOutcome::Counted { attempts });
        }

        self.store
            .set(&keys::lockout(principal_id), "1", self.lockout_duration)
            .await?;
        self.store.delete(&attempts_key).await?;
        warn!(
            principal_id,
            attempts,
            lockout_ms = u64::try_from(self.lockout_duration.as_millis()).unwrap_or(u64::MAX),
            "Account locked after repeated failures"
        );
        Ok(FailureOutcome::Locked {
            remaining: self.lockout_duration,
        })
    }

    /// Clears the failure counter after a successful authentication.
    pub async fn clear(&self, principal_id: i64) -> AppResult<()> {
        self.store.delete(&keys::failed_attempts(principal_id)).await
    }

    /// Current state, for operators.
    pub async fn status(&self, principal_id: i64) -> AppResult<LockoutState> {
        if let Some(remaining) = self.check(principal_id).await? {
            return Ok(LockoutState::Locked { remaining });
        }
        let attempts = self
            .store
            .get(&keys::failed_attempts(principal_id))
            .await?
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(0);
        Ok(LockoutState::Unlocked { attempts })
    }

    /// Lifts a lock and clears the counter.
    pub async fn unlock(&self, principal_id: i64) -> AppResult<()> {
        self.store.delete(&keys::lockout(principal_id)).await?;
        self.clear(principal_id).await?;
        info!(principal_id, "Account unlocked");
        Ok(())
    }

    /// Configured threshold.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}
