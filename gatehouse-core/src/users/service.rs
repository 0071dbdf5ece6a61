//! Account lifecycle use cases.
//!
//! One service owns create, authenticate, fetch, list, update and delete.
//! The acting principal is threaded explicitly into every protected call
//! and checked against a per-operation [`AccessPolicy`] before the store
//! is touched: a non-admin probing a foreign id learns it lacks
//! permission, not whether the record exists.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::Principal;
use crate::auth::access::{AccessPolicy, authorize};
use crate::auth::crypto::{CryptoError, PasswordCrypto};
use crate::domain::user::{NewUser, Role, User, UserQuery, UserUpdate};
use crate::error::AccountError;
use crate::store::{NewUserRecord, UserChanges, UserStore};

/// Operations an admin may perform on any record; ownership opens them to
/// the record's own user.
const SELF_OR_ADMIN: &[Role] = &[Role::Admin];

/// Operations reserved for admins with no ownership override.
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Account lifecycle service. Request-scoped: holds no mutable state
/// between calls beyond the store it borrows.
pub struct UserService {
    store: Arc<dyn UserStore>,
    crypto: PasswordCrypto,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Result<Self, CryptoError> {
        Ok(Self {
            store,
            crypto: PasswordCrypto::new()?,
        })
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Register a new account.
    ///
    /// Fails with [`AccountError::EmailConflict`] when the e-mail is
    /// already registered. The role defaults to `user` unless explicitly
    /// provided.
    pub async fn create(&self, new_user: NewUser) -> Result<User, AccountError> {
        if self.store.find_by_email(&new_user.email).await?.is_some() {
            return Err(AccountError::EmailConflict);
        }

        let password_hash = self
            .crypto
            .hash(&new_user.password)
            .map_err(internal_crypto_error)?;

        let record = NewUserRecord {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash,
            role: new_user.role.unwrap_or_default(),
        };

        // A concurrent registration with the same e-mail can still win the
        // race; the store's unique index maps it back to EmailConflict.
        let user = self.store.create(&record).await?;

        info!(user_id = %user.id, role = %user.role, "user created");

        Ok(user)
    }

    /// Verify an e-mail/password pair.
    ///
    /// On success stamps `last_login` and returns the updated record. The
    /// two failure kinds stay distinct so the boundary can audit them
    /// separately, whatever it renders to end users.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AccountError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AccountError::EmailNotFound)?;

        if !self.crypto.verify(password, &user.password_hash) {
            return Err(AccountError::InvalidCredentials);
        }

        let user = self
            .store
            .touch_last_login(user.id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        info!(user_id = %user.id, "user authenticated");

        Ok(user)
    }

    /// Fetch a single record: admins any, users their own.
    pub async fn get(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
    ) -> Result<User, AccountError> {
        authorize(
            principal,
            &AccessPolicy::require(SELF_OR_ADMIN).owned_by(id),
        )?;

        self.store
            .find_by_id(id)
            .await?
            .ok_or(AccountError::UserNotFound)
    }

    /// List records with optional role filter and sorting. Admin only; an
    /// empty result is a success.
    pub async fn list(
        &self,
        principal: Option<&Principal>,
        query: &UserQuery,
    ) -> Result<Vec<User>, AccountError> {
        authorize(principal, &AccessPolicy::require(ADMIN_ONLY))?;

        Ok(self.store.find_many(query).await?)
    }

    /// Apply a partial update: admins to any record, users to their own.
    /// The `role` field is the exception; no ownership override reaches it.
    pub async fn update(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
        update: UserUpdate,
    ) -> Result<User, AccountError> {
        authorize(
            principal,
            &AccessPolicy::require(SELF_OR_ADMIN)
                .owned_by(id)
                .mutating_role(update.mutates_role()),
        )?;

        let current = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        // Re-check uniqueness only against *other* records, so setting the
        // e-mail to its current value is a no-op rather than a conflict.
        if let Some(ref email) = update.email {
            if let Some(existing) = self.store.find_by_email(email).await? {
                if existing.id != current.id {
                    return Err(AccountError::EmailConflict);
                }
            }
        }

        let password_hash = match update.password {
            Some(ref password) => Some(
                self.crypto.hash(password).map_err(internal_crypto_error)?,
            ),
            None => None,
        };

        let changes = UserChanges {
            name: update.name,
            email: update.email,
            password_hash,
            role: update.role,
        };

        let user = self
            .store
            .update(id, changes)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        info!(user_id = %user.id, "user updated");

        Ok(user)
    }

    /// Remove a record: admins any, users their own. Returns the deleted
    /// snapshot.
    pub async fn delete(
        &self,
        principal: Option<&Principal>,
        id: Uuid,
    ) -> Result<User, AccountError> {
        authorize(
            principal,
            &AccessPolicy::require(SELF_OR_ADMIN).owned_by(id),
        )?;

        let user = self
            .store
            .delete(id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        info!(user_id = %user.id, "user deleted");

        Ok(user)
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").finish_non_exhaustive()
    }
}

fn internal_crypto_error(err: CryptoError) -> AccountError {
    AccountError::Internal(err.to_string())
}
