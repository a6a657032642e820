//! Shared fixtures: an in-memory directory and a manager wired over the
//! in-memory security store.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use argon2::Params;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::sync::RwLock;

use campus_auth::{AuthManager, PasswordHasher, TokenCodec};
use campus_cache::StoreManager;
use campus_cache::memory::MemorySecurityStore;
use campus_core::config::AuthConfig;
use campus_core::config::store::MemoryStoreConfig;
use campus_core::result::AppResult;
use campus_core::traits::SecurityStore;
use campus_entity::principal::{Principal, PrincipalDirectory, Role};

pub const ALICE_SECRET: &str = "Orchard-Lantern-57";

#[derive(Debug, Default)]
pub struct MemoryDirectory {
    principals: RwLock<HashMap<i64, Principal>>,
}

impl MemoryDirectory {
    pub async fn insert(&self, principal: Principal) {
        self.principals.write().await.insert(principal.id, principal);
    }

    pub async fn get(&self, id: i64) -> Option<Principal> {
        self.principals.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl PrincipalDirectory for MemoryDirectory {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<Principal>> {
        Ok(self
            .principals
            .read()
            .await
            .values()
            .find(|p| p.login == login)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Principal>> {
        Ok(self.get(id).await)
    }

    async fn save(&self, principal: &Principal) -> AppResult<()> {
        self.insert(principal.clone()).await;
        Ok(())
    }
}

/// A security store backend that never answers.
#[derive(Debug)]
pub struct StalledStore;

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

pub struct TestContext {
    pub manager: AuthManager,
    pub directory: Arc<MemoryDirectory>,
    pub store: Arc<StoreManager>,
    pub hasher: PasswordHasher,
    pub config: AuthConfig,
}

pub fn test_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: STANDARD.encode([11u8; 32]),
        ..AuthConfig::default()
    }
}

pub fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::with_params(Params::new(1024, 1, 1, None).unwrap())
}

pub async fn context() -> TestContext {
    context_with(test_config()).await
}

pub async fn context_with(config: AuthConfig) -> TestContext {
    context_over(
        config,
        Arc::new(MemorySecurityStore::new(&MemoryStoreConfig::default())),
        Duration::from_secs(2),
    )
    .await
}

/// A manager whose security store never answers within `timeout`.
pub async fn stalled_context(timeout: Duration) -> TestContext {
    context_over(test_config(), Arc::new(StalledStore), timeout).await
}

async fn context_over(
    config: AuthConfig,
    provider: Arc<dyn SecurityStore>,
    timeout: Duration,
) -> TestContext {
    let store = Arc::new(StoreManager::from_provider(provider, timeout));
    let directory = Arc::new(MemoryDirectory::default());
    let codec = Arc::new(TokenCodec::from_config(&config));
    let hasher = cheap_hasher();
    let manager = AuthManager::with_hasher(
        &config,
        codec,
        Arc::clone(&store),
        directory.clone(),
        hasher.clone(),
    );
    let ctx = TestContext {
        manager,
        directory,
        store,
        hasher,
        config,
    };
    ctx.add_principal(1, "alice", ALICE_SECRET, Role::Teacher, true)
        .await;
    ctx
}

impl TestContext {
    pub async fn add_principal(&self, id: i64, login: &str, secret: &str, role: Role, active: bool) {
        let credential_hash = self.hasher.hash_password(secret).unwrap();
        self.directory
            .insert(Principal {
                id,
                login: login.to_string(),
                credential_hash,
                display_name: login.to_uppercase(),
                role,
                active,
                last_authenticated_at: None,
                credential_changed_at: None,
            })
            .await;
    }
}
