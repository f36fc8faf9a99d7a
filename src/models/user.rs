//! User model
//!
//! Accounts that author posts and administer the site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

open_enum! {
    /// Role granted to a user
    pub enum UserRole {
        Admin => "admin",
        Editor => "editor",
        /// Default for new accounts
        Author => "author",
    }
    default = Author;
}

/// A site user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,

    /// Login email (unique)
    pub email: String,

    /// Display name
    pub name: Option<String>,

    /// Hashed credential. Empty when the account has no usable password.
    #[serde(default)]
    pub password_hash: String,

    #[serde(default)]
    pub role: UserRole,

    pub bio: Option<String>,

    pub avatar_url: Option<String>,

    /// Set when the account must choose a new password before logging in
    #[serde(default)]
    pub must_reset_password: bool,

    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with no credential
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: email.into(),
            name: None,
            password_hash: String::new(),
            role: UserRole::default(),
            bio: None,
            avatar_url: None,
            must_reset_password: false,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Whether the user can authenticate with a password
    pub fn has_credential(&self) -> bool {
        !self.password_hash.is_empty()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => write!(f, "{}", self.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_no_credential() {
        let user = User::new(UserId::new(1), "a@x.com");
        assert!(!user.has_credential());
        assert_eq!(user.role, UserRole::Author);
    }

    #[test]
    fn test_role_accepts_uppercase() {
        let role: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"admin\"");

        let role: UserRole = serde_json::from_str("\"SUBSCRIBER\"").unwrap();
        assert_eq!(role.to_string(), "SUBSCRIBER");
    }

    #[test]
    fn test_display() {
        let mut user = User::new(UserId::new(1), "a@x.com");
        assert_eq!(user.to_string(), "a@x.com");
        user.name = Some("Ada".into());
        assert_eq!(user.to_string(), "Ada <a@x.com>");
    }
}
