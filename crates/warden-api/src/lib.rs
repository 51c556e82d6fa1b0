//! Warden REST API
//!
//! This crate provides the Axum-based HTTP surface for Warden:
//! registration, login and session verification.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{cors_layer, create_router};
pub use state::{AppState, CookieSettings};
