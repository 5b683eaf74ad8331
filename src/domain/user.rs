//! Authenticated users, roles, and login credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operator persona of a logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Drafts campaigns and manages client accounts.
    Agency,
    /// Approves or denies the campaigns assigned to it.
    Client,
}

impl Role {
    /// Returns the role as its persisted lowercase string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Agency => "agency",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The currently logged-in user, persisted as the session.
///
/// There is no token or expiry: the username/role pair is trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Canonical username (agency name or client email).
    pub username: String,
    /// Role granted at login.
    pub role: Role,
}

/// Username/password pair submitted at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Username as typed; matched case-insensitively.
    pub username: String,
    /// Password as typed; matched exactly.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns `true` if these credentials match `username`/`password`.
    ///
    /// Usernames compare case-insensitively; passwords compare exactly.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username.to_lowercase() == username.to_lowercase() && self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_is_case_insensitive() {
        let creds = Credentials::new("KAI@HabitualHerbs.com", "Herbs1$!");
        assert!(creds.matches("kai@habitualherbs.com", "Herbs1$!"));
    }

    #[test]
    fn password_is_case_sensitive() {
        let creds = Credentials::new("kai@habitualherbs.com", "herbs1$!");
        assert!(!creds.matches("kai@habitualherbs.com", "Herbs1$!"));
    }

    #[test]
    fn role_serializes_lowercase() {
        let user = User {
            username: "BizyPro".to_string(),
            role: Role::Agency,
        };
        let json = serde_json::to_string(&user).unwrap_or_default();
        assert_eq!(json, r#"{"username":"BizyPro","role":"agency"}"#);
    }
}
