//! Revoked access tokens, kept until they would have expired anyway.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use campus_cache::StoreManager;
use campus_cache::keys;
use campus_core::result::AppResult;
use campus_core::traits::SecurityStore;

/// Shared set of revoked token values.
#[derive(Debug, Clone)]
pub struct RevocationList {
    store: Arc<StoreManager>,
}

impl RevocationList {
    /// Creates a revocation list on top of the shared store.
    pub fn new(store: Arc<StoreManager>) -> Self {
        Self { store }
    }

    /// Revokes `token` for `remaining`. A token with no lifetime left is
    /// already unusable and is not recorded.
    pub async fn revoke(&self, token: &str, remaining: Duration) -> AppResult<()> {
        if remaining.is_zero() {
            debug!("Token already expired; nothing to revoke");
            return Ok(());
        }
        self.store
            .set(&keys::revoked_token(token), "1", remaining)
            .await
    }

    /// Whether `token` has been revoked.
    pub async fn contains(&self, token: &str) -> AppResult<bool> {
        self.store.exists(&keys::revoked_token(token)).await
    }
}
