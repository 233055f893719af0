//! Roles, principals, access control and password hashing.

mod access;
mod password;

pub use access::{AccessError, authorize, visible_owner};
pub use password::{PasswordError, hash_password, verify_password, verify_password_or_dummy};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thbfx_shared::types::UserId;
use thiserror::Error;

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    /// Sees and mutates every record, manages users.
    #[serde(rename = "admin")]
    Admin,
    /// Sees and mutates only records they created.
    #[default]
    #[serde(rename = "user")]
    StandardUser,
}

impl Role {
    /// Stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::StandardUser => "user",
        }
    }

    /// Returns true for [`Role::Admin`].
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown role string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::StandardUser),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// User id.
    pub id: UserId,
    /// Role at the time the token was issued.
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns true if this principal is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::StandardUser);
        assert!("Admin".parse::<Role>().is_err());
        assert!("owner".parse::<Role>().is_err());

        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::StandardUser.to_string(), "user");
        assert_eq!(Role::default(), Role::StandardUser);
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(
            serde_json::to_value(Role::StandardUser).unwrap(),
            serde_json::json!("user")
        );
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
    }

    #[test]
    fn test_principal_is_admin() {
        assert!(Principal::new(UserId::new(), Role::Admin).is_admin());
        assert!(!Principal::new(UserId::new(), Role::StandardUser).is_admin());
    }
}
