//! Authentication flows: authenticate, refresh, logout, credential change.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use campus_cache::StoreManager;
use campus_core::config::AuthConfig;
use campus_core::error::AppError;
use campus_entity::principal::{Principal, PrincipalDirectory, PrincipalView};

use crate::error::{AuthError, TokenError};
use crate::jwt::{Claims, IssuedToken, TokenCodec, TokenType};
use crate::lockout::{FailureOutcome, LockoutPolicy, LockoutState};
use crate::password::{PasswordHasher, PasswordValidator};

use super::registry::RefreshRegistry;
use super::revocation::RevocationList;

/// Scheme name returned with every token.
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

const REASON_INVALID: &str = "invalid token";
const REASON_EXPIRED: &str = "refresh token expired";
const REASON_SUPERSEDED: &str = "refresh token invalid";
const REASON_REVOKED: &str = "token revoked";

/// Result of a successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived access token.
    pub access_token: String,
    /// Refresh token, now the principal's registered one.
    pub refresh_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in milliseconds.
    pub expires_in_ms: u64,
    /// Public view of the authenticated principal.
    pub principal: PrincipalView,
}

/// Result of a successful refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshedToken {
    /// New access token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Access token lifetime in milliseconds.
    pub expires_in_ms: u64,
}

/// Orchestrates credential checks, lockout, token issuance and revocation.
///
/// Per-principal state is derived from the shared store, never held here,
/// so any number of managers on any number of nodes agree on it.
#[derive(Clone)]
pub struct AuthManager {
    codec: Arc<TokenCodec>,
    directory: Arc<dyn PrincipalDirectory>,
    hasher: Arc<PasswordHasher>,
    validator: Arc<PasswordValidator>,
    lockout: LockoutPolicy,
    registry: RefreshRegistry,
    revocations: RevocationList,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("codec", &self.codec)
            .field("directory", &self.directory)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl AuthManager {
    /// Wires a manager with the default Argon2 parameters.
    pub fn new(
        config: &AuthConfig,
        codec: Arc<TokenCodec>,
        store: Arc<StoreManager>,
        directory: Arc<dyn PrincipalDirectory>,
    ) -> Self {
        Self::with_hasher(config, codec, store, directory, PasswordHasher::new())
    }

    /// Wires a manager with an explicit credential hasher.
    pub fn with_hasher(
        config: &AuthConfig,
        codec: Arc<TokenCodec>,
        store: Arc<StoreManager>,
        directory: Arc<dyn PrincipalDirectory>,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            codec,
            directory,
            hasher: Arc::new(hasher),
            validator: Arc::new(PasswordValidator::new(config)),
            lockout: LockoutPolicy::new(config, Arc::clone(&store)),
            registry: RefreshRegistry::new(Arc::clone(&store)),
            revocations: RevocationList::new(store),
            access_ttl: Duration::from_millis(config.access_token_ttl_ms),
            refresh_ttl: Duration::from_millis(config.refresh_token_ttl_ms),
        }
    }

    /// Verifies `secret` for `login` and issues an access and refresh token.
    ///
    /// Order of checks:
    /// 1. Unknown login fails as `InvalidCredentials` without counting.
    /// 2. A locked principal fails as `AccountLocked` before the secret is hashed.
    /// 3. An inactive principal fails as `AccountInactive`.
    /// 4. A wrong secret is counted; reaching the threshold locks the principal.
    /// 5. On success the counter is cleared and the refresh token registered.
    pub async fn authenticate(&self, login: &str, secret: &str) -> Result<AuthTokens, AuthError> {
        let Some(mut principal) = self.directory.find_by_login(login).await? else {
            debug!("Authentication for unknown login");
            return Err(AuthError::InvalidCredentials);
        };

        if let Some(remaining) = self.lockout.check(principal.id).await? {
            warn!(principal_id = principal.id, "Authentication attempt on locked account");
            return Err(locked(Some(remaining)));
        }

        if !principal.active {
            warn!(principal_id = principal.id, "Authentication attempt on inactive account");
            return Err(AuthError::AccountInactive);
        }

        if !self
            .hasher
            .verify_password(secret, &principal.credential_hash)?
        {
            return match self.lockout.record_failure(principal.id).await? {
                FailureOutcome::Locked { remaining } => Err(locked(Some(remaining))),
                FailureOutcome::Counted { .. } => Err(AuthError::InvalidCredentials),
            };
        }

        self.lockout.clear(principal.id).await?;

        let access = self.issue(&principal, TokenType::Access, self.access_ttl)?;
        let refresh = self.issue(&principal, TokenType::Refresh, self.refresh_ttl)?;
        self.registry
            .register(principal.id, &refresh.value, self.refresh_ttl)
            .await?;

        principal.mark_authenticated(Utc::now());
        if let Err(e) = self.directory.save(&principal).await {
            warn!(
                principal_id = principal.id,
                error = %e,
                "Failed to record last authentication time"
            );
        }

        info!(
            principal_id = principal.id,
            role = %principal.role,
            "Authentication successful"
        );

        Ok(AuthTokens {
            access_token: access.value,
            refresh_token: refresh.value,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in_ms: duration_ms(self.access_ttl),
            principal: PrincipalView::from(&principal),
        })
    }

    /// Exchanges the principal's registered refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated and stays valid until it
    /// expires, is superseded by a new authentication, or is cleared by
    /// logout.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken, AuthError> {
        let claims = self
            .codec
            .verify(refresh_token)
            .map_err(|e| rejected("refresh", e))?;
        if claims.token_type != TokenType::Refresh {
            debug!("Refresh attempted with a non-refresh token");
            return Err(AuthError::Unauthorized(REASON_INVALID));
        }

        let principal = self
            .directory
            .find_by_login(&claims.sub)
            .await?
            .filter(|p| claims.uid.is_none_or(|uid| uid == p.id))
            .ok_or(AuthError::Unauthorized(REASON_INVALID))?;
        if !principal.active {
            warn!(principal_id = principal.id, "Refresh attempted for inactive account");
            return Err(AuthError::Unauthorized(REASON_INVALID));
        }

        match self.registry.current(principal.id).await? {
            None => {
                debug!(principal_id = principal.id, "No refresh token registered");
                return Err(AuthError::Unauthorized(REASON_EXPIRED));
            }
            Some(registered) if registered.as_bytes() != refresh_token.as_bytes() => {
                warn!(
                    principal_id = principal.id,
                    "Refresh token does not match the registered one"
                );
                return Err(AuthError::Unauthorized(REASON_SUPERSEDED));
            }
            Some(_) => {}
        }

        let access = self.issue(&principal, TokenType::Access, self.access_ttl)?;
        info!(principal_id = principal.id, "Access token refreshed");

        Ok(RefreshedToken {
            access_token: access.value,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in_ms: duration_ms(self.access_ttl),
        })
    }

    /// Revokes `access_token` and drops the principal's refresh registration.
    ///
    /// Never fails to the caller. Store errors are logged; repeating the
    /// call converges on the same state.
    pub async fn logout(&self, access_token: &str, principal_id: i64) {
        match self.codec.verify(access_token) {
            Ok(claims) => {
                if let Err(e) = self
                    .revocations
                    .revoke(access_token, claims.remaining())
                    .await
                {
                    error!(principal_id, error = %e, "Failed to revoke access token");
                }
            }
            Err(e) => debug!(principal_id, cause = %e, "Logout token no longer valid; not revoked"),
        }

        if let Err(e) = self.registry.clear(principal_id).await {
            error!(principal_id, error = %e, "Failed to clear refresh registration");
        }

        info!(principal_id, "Logout completed");
    }

    /// Whether `access_token` has been revoked.
    ///
    /// Returns `true` when the store cannot answer, so an unreachable
    /// store never lets a revoked token through.
    pub async fn is_revoked(&self, access_token: &str) -> bool {
        match self.revocations.contains(access_token).await {
            Ok(revoked) => revoked,
            Err(e) => {
                error!(error = %e, "Revocation lookup failed; treating token as revoked");
                true
            }
        }
    }

    /// Full check for a protected resource: valid access token, not revoked.
    pub async fn authorize(&self, access_token: &str) -> Result<Claims, AuthError> {
        let claims = self
            .codec
            .verify(access_token)
            .map_err(|e| rejected("authorize", e))?;
        if claims.token_type != TokenType::Access {
            debug!("Refresh token presented as access token");
            return Err(AuthError::Unauthorized(REASON_INVALID));
        }
        if self.revocations.contains(access_token).await? {
            debug!(subject = %claims.sub, "Revoked token presented");
            return Err(AuthError::Unauthorized(REASON_REVOKED));
        }
        Ok(claims)
    }

    /// Replaces the principal's credential after verifying the current one.
    ///
    /// A wrong current secret counts toward lockout like a failed
    /// authentication. On success the refresh registration is dropped, so
    /// other sessions must authenticate again once their access token
    /// expires.
    pub async fn change_secret(
        &self,
        principal_id: i64,
        current: &str,
        new_secret: &str,
    ) -> Result<(), AuthError> {
        let mut principal = self
            .directory
            .find_by_id(principal_id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if let Some(remaining) = self.lockout.check(principal.id).await? {
            return Err(locked(Some(remaining)));
        }
        if !principal.active {
            return Err(AuthError::AccountInactive);
        }

        if !self
            .hasher
            .verify_password(current, &principal.credential_hash)?
        {
            return match self.lockout.record_failure(principal.id).await? {
                FailureOutcome::Locked { remaining } => Err(locked(Some(remaining))),
                FailureOutcome::Counted { .. } => Err(AuthError::InvalidCredentials),
            };
        }
        self.lockout.clear(principal.id).await?;

        self.validator.validate_not_same(current, new_secret)?;
        self.validator.validate(new_secret)?;

        let hash = self.hasher.hash_password(new_secret)?;
        principal.replace_credential(hash, Utc::now());
        self.directory.save(&principal).await?;
        self.registry.clear(principal.id).await?;

        info!(principal_id = principal.id, "Credential changed");
        Ok(())
    }

    /// Current lockout state of a principal.
    pub async fn lockout_status(&self, principal_id: i64) -> Result<LockoutState, AuthError> {
        Ok(self.lockout.status(principal_id).await?)
    }

    /// Lifts a lockout.
    pub async fn unlock(&self, principal_id: i64) -> Result<(), AuthError> {
        Ok(self.lockout.unlock(principal_id).await?)
    }

    /// The codec tokens are signed with.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    fn issue(
        &self,
        principal: &Principal,
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<IssuedToken, AuthError> {
        self.codec
            .issue(
                &principal.login,
                Some(principal.id),
                &principal.role.authorities(),
                token_type,
                ttl,
            )
            .map_err(|e| {
                error!(principal_id = principal.id, error = %e, "Token issuance failed");
                AuthError::Internal(AppError::internal(format!("Token issuance failed: {e}")))
            })
    }
}

fn locked(remaining: Option<Duration>) -> AuthError {
    AuthError::AccountLocked {
        retry_after_ms: remaining.map(duration_ms),
    }
}

fn rejected(op: &'static str, cause: TokenError) -> AuthError {
    debug!(op, cause = %cause, "Token rejected");
    AuthError::Unauthorized(REASON_INVALID)
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
