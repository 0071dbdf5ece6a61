//! Authentication and authorization primitives.

pub mod access;
pub mod crypto;
pub mod token;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::Role;

/// The authenticated identity derived from a verified token.
///
/// Reconstructed fresh for every request from the token's claims and never
/// persisted; its lifetime is one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The user id the token was issued for.
    pub subject: Uuid,
    /// The role captured at issuance time.
    pub role: Role,
}

impl Principal {
    pub fn new(subject: Uuid, role: Role) -> Self {
        Self { subject, role }
    }
}
