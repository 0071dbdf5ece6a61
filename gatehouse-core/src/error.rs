//! Error taxonomy for the account core.
//!
//! Every failure a use case can surface is enumerated here so the boundary
//! can map each one to a caller-visible outcome. None of these are fatal to
//! the process.
//!
//! Authentication failures ([`AccountError::Unauthenticated`],
//! [`AccountError::InvalidToken`]) are kept distinct from authorization
//! failures ([`AccountError::InsufficientRole`],
//! [`AccountError::RoleMutationForbidden`]) since they imply different
//! remediation: re-login versus a permission escalation request.

use thiserror::Error;

use crate::store::StoreError;

/// Failures surfaced by the account lifecycle use cases.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The e-mail address is already bound to another user record.
    #[error("e-mail address already in use")]
    EmailConflict,

    /// No record matches the e-mail address given at authentication.
    ///
    /// Kept distinct from [`AccountError::InvalidCredentials`] for audit
    /// logging; the boundary may render both identically to avoid account
    /// enumeration.
    #[error("e-mail address is not registered")]
    EmailNotFound,

    /// The password did not match the stored hash.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The target user id does not exist.
    #[error("user not found")]
    UserNotFound,

    /// The bearer token was forged, malformed or expired. The three cases
    /// are deliberately indistinguishable to callers.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The operation requires an authenticated principal and none was
    /// presented.
    #[error("authentication required")]
    Unauthenticated,

    /// The principal's role does not satisfy the operation's requirements
    /// and no ownership override applies.
    #[error("insufficient permissions")]
    InsufficientRole,

    /// A non-admin principal attempted to change a user's role, their own
    /// included.
    #[error("only administrators may change a user's role")]
    RoleMutationForbidden,

    /// The user store failed for reasons unrelated to the request.
    #[error("user store failure: {0}")]
    Store(StoreError),

    /// Infrastructure failure outside the store (hashing, signing).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            // Uniqueness is enforced atomically by the store; a violation
            // slipping past the use case's check-then-act is still an
            // e-mail conflict to the caller.
            StoreError::DuplicateEmail => AccountError::EmailConflict,
            other => AccountError::Store(other),
        }
    }
}
