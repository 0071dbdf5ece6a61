//! Account domain core for the Gatehouse user service.
//!
//! This crate owns everything the HTTP boundary consumes through narrow
//! interfaces:
//!
//! - **Password hashing** ([`auth::crypto::PasswordCrypto`]): Argon2id with a
//!   per-call random salt.
//! - **Token service** ([`auth::token::TokenService`]): stateless HS256-signed
//!   claims, valid until expiry with no server-side revocation.
//! - **Authorization engine** ([`auth::access`]): per-request decisions
//!   combining declared role requirements with resource ownership.
//! - **User store port** ([`store::UserStore`]): the persistence contract,
//!   with Postgres and in-memory implementations.
//! - **Account lifecycle use cases** ([`users::service::UserService`]):
//!   create, authenticate, fetch, list, update, delete.
//!
//! The crate never reads the environment or touches the network on its own;
//! configuration values (signing secret, token TTL, database pool) are
//! injected by the caller.

pub mod auth;
pub mod domain;
pub mod error;
pub mod store;
pub mod users;

pub use auth::Principal;
pub use domain::user::{NewUser, Role, User, UserQuery, UserUpdate};
pub use error::AccountError;
pub use store::UserStore;
pub use users::service::UserService;

/// Embedded SQL migrations for the Postgres-backed user store.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
