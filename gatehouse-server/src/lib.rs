//! HTTP boundary for the Gatehouse user-account service.
//!
//! Everything here is translation: bearer tokens in, principals out;
//! domain errors in, status codes out. The authorization and lifecycle
//! decisions all live in `gatehouse-core`.

pub mod api_types;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod routes;

pub use app_state::AppState;
pub use routes::build_router;
