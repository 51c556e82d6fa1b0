//! Warden Account Store
//!
//! This crate provides the account persistence layer for Warden,
//! using SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;
pub mod store;
pub mod utils;

pub use error::DbError;
pub use models::{Account, NewAccount};
pub use repository::Database;
pub use store::AccountStore;
