//! Public projection of a principal returned after authentication.

use serde::{Deserialize, Serialize};

use super::model::Principal;
use super::role::Role;

/// What a caller may see about the authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalView {
    /// Principal identifier.
    pub id: i64,
    /// Login name.
    pub login: String,
    /// Display name.
    pub display_name: String,
    /// Assigned role.
    pub role: Role,
    /// Permissions resolved from the role.
    pub permissions: Vec<String>,
}

impl From<&Principal> for PrincipalView {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id,
            login: principal.login.clone(),
            display_name: principal.display_name.clone(),
            role: principal.role,
            permissions: principal
                .role
                .permissions()
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}
