//! Lookup contract for principals, implemented by the persistence layer.

use async_trait::async_trait;

use campus_core::result::AppResult;

use super::model::Principal;

/// Resolves principals for the authentication flows.
///
/// Implementations own persistence; the trust layer only reads principals
/// and saves the fields it mutates (last-authenticated and credential
/// change timestamps, credential hash).
#[async_trait]
pub trait PrincipalDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find a principal by its unique login.
    async fn find_by_login(&self, login: &str) -> AppResult<Option<Principal>>;

    /// Find a principal by primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Principal>>;

    /// Persist the mutable fields of an existing principal.
    async fn save(&self, principal: &Principal) -> AppResult<()>;
}
