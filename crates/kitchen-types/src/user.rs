// ABOUTME: Session user role derived from the startup payload or query override
// ABOUTME: Immutable for the lifetime of a session

use serde::{Deserialize, Serialize};

/// Role of the user driving the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Guest,
    User,
    Admin,
}

impl UserRole {
    /// Parse the wire name used by the page (`guest`, `user`, `admin`).
    ///
    /// Unknown names carry no privileges and map to `Guest`.
    pub fn from_wire(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => UserRole::Admin,
            "user" => UserRole::User,
            _ => UserRole::Guest,
        }
    }

    /// Whether the user has admin privilege
    pub fn is_admin(self) -> bool {
        self == UserRole::Admin
    }

    /// Whether the user is signed in (admins included)
    pub fn is_user(self) -> bool {
        matches!(self, UserRole::User | UserRole::Admin)
    }

    /// Resolve the session role, letting a `?user=` override win over the payload
    pub fn resolve(query_override: Option<&str>, payload: &str) -> Self {
        match query_override.filter(|s| !s.is_empty()) {
            Some(name) => Self::from_wire(name),
            None => Self::from_wire(payload),
        }
    }
}
