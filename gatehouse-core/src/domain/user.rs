//! User records and the value types that move through the lifecycle use
//! cases.
//!
//! The password hash is carried on [`User`] so the credential verifier can
//! compare against it, but it is never serialized: any external-facing
//! projection of a user record omits it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access level attached to every user record and token claim.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Standard account; may act on its own record only.
    #[default]
    User,
    /// May act on any record, including role changes.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered account.
///
/// `email` is unique across all records (case-sensitive, enforced by the
/// store). `password_hash` is an Argon2id PHC string, never the plaintext
/// password, and is skipped during serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Unique e-mail address, matched case-sensitively.
    pub email: String,
    /// Argon2id hash of the password (never serialized).
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Access level; defaults to `user` at creation.
    pub role: Role,
    /// Timestamp of the most recent successful authentication.
    pub last_login: Option<DateTime<Utc>>,
    /// Timestamp of account creation.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Plaintext password; hashed before it ever reaches the store.
    pub password: String,
    /// Defaults to [`Role::User`] when omitted.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Partial update of an account. Only provided fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Plaintext replacement password; re-hashed before persisting.
    pub password: Option<String>,
    /// Role changes are gated to admin principals by the authorization
    /// engine regardless of ownership.
    pub role: Option<Role>,
}

impl UserUpdate {
    /// Whether this update touches the `role` field.
    pub fn mutates_role(&self) -> bool {
        self.role.is_some()
    }
}

/// Sortable fields for user listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Lexicographic order over the display name.
    Name,
    /// Chronological order over the creation timestamp.
    CreatedAt,
}

/// Sort direction for user listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Filter and ordering for [`crate::store::UserStore::find_many`].
///
/// With no filter and no sort the store returns records in its natural
/// (insertion) order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub role: Option<Role>,
    pub sort_by: Option<SortField>,
    pub order: Option<SortOrder>,
}
