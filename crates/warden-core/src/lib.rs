//! Warden Core Business Logic
//!
//! This crate composes the account store, password hashing and session
//! tokens into the register, authenticate and verify flows.

pub mod error;
pub mod service;
pub mod validation;

pub use error::CoreError;
pub use service::{AccountService, IssuedSession, NewAccountRequest};
