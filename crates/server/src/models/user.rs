//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bloomery_core::{Email, Role, UserId};

/// A shop user (domain type).
///
/// The password hash stays in the database layer and never appears here.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Account role (`USER` or `ADMIN`).
    pub role: Role,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Minimal user info embedded in other payloads (orders, messages).
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Contact details attached to a user, stored separately from the account.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Profile {
    pub phone: Option<String>,
    pub address: Option<String>,
}
