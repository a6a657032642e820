//! Role enumeration and its static permission table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of roles. Each maps to a fixed permission set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "principal_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// School administrator.
    Admin,
    /// Teaching staff.
    Teacher,
    /// Fee ledger staff.
    Accountant,
    /// Read-only access.
    Viewer,
}

const ADMIN_PERMISSIONS: &[&str] = &[
    "student:read",
    "student:write",
    "class:read",
    "class:write",
    "fee:read",
    "fee:write",
    "report:generate",
    "user:manage",
];

const TEACHER_PERMISSIONS: &[&str] = &["student:read", "student:write", "class:read", "class:write"];

const ACCOUNTANT_PERMISSIONS: &[&str] = &["student:read", "fee:read", "fee:write", "report:generate"];

const VIEWER_PERMISSIONS: &[&str] = &["student:read", "class:read", "fee:read"];

impl Role {
    /// All roles, in descending privilege order.
    pub const ALL: [Role; 4] = [Self::Admin, Self::Teacher, Self::Accountant, Self::Viewer];

    /// The permission strings granted to this role.
    pub fn permissions(self) -> &'static [&'static str] {
        match self {
            Self::Admin => ADMIN_PERMISSIONS,
            Self::Teacher => TEACHER_PERMISSIONS,
            Self::Accountant => ACCOUNTANT_PERMISSIONS,
            Self::Viewer => VIEWER_PERMISSIONS,
        }
    }

    /// The role authority plus every permission, flattened for token claims.
    pub fn authorities(self) -> Vec<String> {
        std::iter::once(format!("ROLE_{}", self.as_str().to_uppercase()))
            .chain(self.permissions().iter().map(|p| (*p).to_string()))
            .collect()
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Accountant => "accountant",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = campus_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "accountant" => Ok(Self::Accountant),
            "viewer" => Ok(Self::Viewer),
            _ => Err(campus_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: admin, teacher, accountant, viewer"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_has_permissions() {
        for role in Role::ALL {
            assert!(!role.permissions().is_empty(), "{role} has no permissions");
        }
    }

    #[test]
    fn test_admin_is_superset() {
        for role in Role::ALL {
            for permission in role.permissions() {
                assert!(Role::Admin.permissions().contains(permission));
            }
        }
    }

    #[test]
    fn test_authorities_lead_with_role() {
        let authorities = Role::Accountant.authorities();
        assert_eq!(authorities[0], "ROLE_ACCOUNTANT");
        assert!(authorities.contains(&"fee:write".to_string()));
        assert!(!authorities.contains(&"user:manage".to_string()));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("TEACHER".parse::<Role>().unwrap(), Role::Teacher);
        assert!("janitor".parse::<Role>().is_err());
    }
}
