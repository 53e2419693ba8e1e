//! Session user model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Guest,
    User,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Guest => write!(f, "GUEST"),
            Self::User => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

/// Signed-in user. Opaque to the scan workflow apart from gating access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl User {
    /// Fixed demo identity for a role
    pub fn demo(role: UserRole) -> Self {
        let (name, email) = match role {
            UserRole::Admin => ("Admin User", "admin@mobsafe.com"),
            UserRole::User => ("Jane Doe", "jane@example.com"),
            UserRole::Guest => ("Guest", ""),
        };

        Self {
            id: "1".to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
