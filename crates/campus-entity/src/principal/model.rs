//! Principal entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::Role;

/// An account that can authenticate against Campus.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Principal {
    /// Unique principal identifier.
    pub id: i64,
    /// Unique login name.
    pub login: String,
    /// Argon2 PHC-format credential hash.
    #[serde(skip_serializing)]
    pub credential_hash: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Assigned role.
    pub role: Role,
    /// Inactive principals cannot authenticate or refresh.
    pub active: bool,
    /// Last successful authentication.
    pub last_authenticated_at: Option<DateTime<Utc>>,
    /// Last credential change.
    pub credential_changed_at: Option<DateTime<Utc>>,
}

impl Principal {
    /// Record a successful authentication at `at`.
    pub fn mark_authenticated(&mut self, at: DateTime<Utc>) {
        self.last_authenticated_at = Some(at);
    }

    /// Replace the stored credential hash and stamp the change time.
    pub fn replace_credential(&mut self, credential_hash: String, at: DateTime<Utc>) {
        self.credential_hash = credential_hash;
        self.credential_changed_at = Some(at);
    }
}
