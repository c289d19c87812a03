//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - User role definitions

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// User roles within an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, can transfer ownership.
    Owner,
    /// Full access except ownership transfer.
    Admin,
    /// Can record treasury, billing and stock operations.
    Operator,
    /// Read-only access.
    Viewer,
}

impl UserRole {
    /// Returns true if this role can write to the organization's books.
    #[must_use]
    pub const fn can_write(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin | Self::Operator)
    }

    /// Returns true if this role can manage users.
    #[must_use]
    pub const fn can_manage_users(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Returns true if this role can modify organization settings.
    #[must_use]
    pub const fn can_modify_settings(&self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Admin => write!(f, "admin"),
            Self::Operator => write!(f, "operator"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "operator" => Ok(Self::Operator),
            "viewer" => Ok(Self::Viewer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Owner.can_write());
        assert!(UserRole::Admin.can_write());
        assert!(UserRole::Operator.can_write());
        assert!(!UserRole::Viewer.can_write());

        assert!(UserRole::Owner.can_manage_users());
        assert!(UserRole::Admin.can_manage_users());
        assert!(!UserRole::Operator.can_manage_users());
        assert!(!UserRole::Viewer.can_manage_users());
    }

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::Owner,
            UserRole::Admin,
            UserRole::Operator,
            UserRole::Viewer,
        ] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
    }
}
