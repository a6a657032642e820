//! One live refresh token per principal.

use std::sync::Arc;
use std::time::Duration;

use campus_cache::StoreManager;
use campus_cache::keys;
use campus_core::result::AppResult;
use campus_core::traits::SecurityStore;

/// Records the refresh token most recently issued to each principal.
///
/// Registering overwrites any earlier entry, so a new authentication
/// supersedes the previous refresh token.
#[derive(Debug, Clone)]
pub struct RefreshRegistry {
    store: Arc<StoreManager>,
}

impl RefreshRegistry {
    /// Creates a registry on top of the shared store.
    pub fn new(store: Arc<StoreManager>) -> Self {
        Self { store }
    }

    /// Registers `token` as the principal's refresh token for `ttl`.
    pub async fn register(&self, principal_id: i64, token: &str, ttl: Duration) -> AppResult<()> {
        self.store
            .set(&keys::refresh_registration(principal_id), token, ttl)
            .await
    }

    /// The registered token, if it has not expired or been cleared.
    pub async fn current(&self, principal_id: i64) -> AppResult<Option<String>> {
        self.store
            .get(&keys::refresh_registration(principal_id))
            .await
    }

    /// Drops the registration.
    pub async fn clear(&self, principal_id: i64) -> AppResult<()> {
        self.store
            .delete(&keys::refresh_registration(principal_id))
            .await
    }
}
