//! Per-request authorization decisions.
//!
//! A state-free, two-axis check: an operation declares the roles allowed to
//! perform it, and optionally the id of the user owning the target
//! resource. A principal passes when either axis is satisfied, with one
//! carve-out: changing a user's `role` field is an admin-only operation
//! that ownership never overrides. A `user` may read, update and delete
//! their own record but never elevate their own role.
//!
//! Required roles are explicit per-operation values passed in by the
//! caller; there is no ambient request state and no registry.

use thiserror::Error;
use uuid::Uuid;

use crate::auth::Principal;
use crate::domain::user::Role;
use crate::error::AccountError;

/// Why an access decision denied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No verified principal was presented.
    #[error("authentication required")]
    Unauthenticated,
    /// Neither the role axis nor the ownership axis was satisfied.
    #[error("insufficient permissions")]
    InsufficientRole,
    /// Role mutation attempted by a non-admin principal.
    #[error("only administrators may change a user's role")]
    RoleMutationForbidden,
}

impl From<AccessError> for AccountError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => AccountError::Unauthenticated,
            AccessError::InsufficientRole => AccountError::InsufficientRole,
            AccessError::RoleMutationForbidden => {
                AccountError::RoleMutationForbidden
            }
        }
    }
}

/// Declared requirements for one protected operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy<'a> {
    /// Roles allowed regardless of ownership. Empty means any
    /// authenticated principal.
    pub required_roles: &'a [Role],
    /// Owner of the target resource, for self-service operations.
    pub target_owner: Option<Uuid>,
    /// Whether the operation changes a user's `role` field.
    pub mutates_role: bool,
}

impl<'a> AccessPolicy<'a> {
    /// Any authenticated principal.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn require(required_roles: &'a [Role]) -> Self {
        Self {
            required_roles,
            target_owner: None,
            mutates_role: false,
        }
    }

    pub fn owned_by(mut self, owner: Uuid) -> Self {
        self.target_owner = Some(owner);
        self
    }

    pub fn mutating_role(mut self, mutates_role: bool) -> Self {
        self.mutates_role = mutates_role;
        self
    }
}

/// Decide whether `principal` may perform the operation described by
/// `policy`. Computed fresh per request; no state is consulted or held.
pub fn authorize(
    principal: Option<&Principal>,
    policy: &AccessPolicy<'_>,
) -> Result<(), AccessError> {
    let Some(principal) = principal else {
        return Err(AccessError::Unauthenticated);
    };

    let role_ok = policy.required_roles.is_empty()
        || policy.required_roles.contains(&principal.role);
    let owner_ok = policy.target_owner == Some(principal.subject);

    if !role_ok && !owner_ok {
        return Err(AccessError::InsufficientRole);
    }

    // Ownership lets a principal act on their own record, but never
    // extends to changing the role field.
    if policy.mutates_role && principal.role != Role::Admin {
        return Err(AccessError::RoleMutationForbidden);
    }

    Ok(())
}
