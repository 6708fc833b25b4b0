//! User and role types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::UserId;

/// A player or administrator account.
///
/// Users are created on first session sync and updated on every subsequent
/// sync (`last_seen_at`). The application never deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID (issued by the identity provider).
    pub id: UserId,

    /// Display handle.
    pub handle: String,

    /// Access role.
    pub role: Role,

    /// When the user was first seen.
    pub created_at: DateTime<Utc>,

    /// When the user last synced a session.
    pub last_seen_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the default `user` role.
    #[must_use]
    pub fn new(id: UserId, handle: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            handle,
            role: Role::User,
            created_at: now,
            last_seen_at: now,
        }
    }

    /// Check whether the user holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular player.
    User,

    /// Administrator with access to the admin endpoints.
    Admin,
}

impl Role {
    /// Get the role name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(CoreError::UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_has_user_role() {
        let user = User::new(UserId::generate(), "kaz".into());
        assert_eq!(user.role, Role::User);
        assert!(!user.is_admin());
        assert_eq!(user.created_at, user.last_seen_at);
    }

    #[test]
    fn role_roundtrip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "user");
        assert!("overlord".parse::<Role>().is_err());
    }

    #[test]
    fn role_serde_snake_case() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");
    }
}
