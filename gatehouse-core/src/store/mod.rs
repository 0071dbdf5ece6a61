//! The user store port.
//!
//! Persistence is an external collaborator: the core only reads and writes
//! through this trait and never touches storage internals. E-mail
//! uniqueness is the store's responsibility and must hold atomically (a
//! unique index, not an application-level check), since the lifecycle use
//! cases perform check-then-act sequences that can race.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::user::{Role, User, UserQuery};

pub use memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

/// Failures surfaced by a store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The e-mail uniqueness constraint was violated.
    #[error("e-mail address already in use")]
    DuplicateEmail,
    /// Anything else the backend can fail with.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Record handed to [`UserStore::create`]; the caller assigns the id and
/// timestamps so the store stays a dumb persistence layer.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Field-level changes for [`UserStore::update`]. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Persistence contract for user records.
///
/// Lookup methods signal absence with `None`; only `create` and `update`
/// can surface a uniqueness violation, as [`StoreError::DuplicateEmail`].
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new record. Timestamps are stamped by the store.
    async fn create(&self, record: &NewUserRecord) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Case-sensitive exact match on the e-mail column.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Filtered, optionally sorted listing. No filter and no sort returns
    /// every record in natural (insertion) order; an empty result is a
    /// success, never an error.
    async fn find_many(
        &self,
        query: &UserQuery,
    ) -> Result<Vec<User>, StoreError>;

    /// Apply the provided fields and bump `updated_at`. `None` when the id
    /// is absent.
    async fn update(
        &self,
        id: Uuid,
        changes: UserChanges,
    ) -> Result<Option<User>, StoreError>;

    /// Remove the record, returning the deleted snapshot. `None` when the
    /// id is absent.
    async fn delete(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Stamp `last_login = now` and return the updated record. `None` when
    /// the id is absent.
    async fn touch_last_login(
        &self,
        id: Uuid,
    ) -> Result<Option<User>, StoreError>;
}
