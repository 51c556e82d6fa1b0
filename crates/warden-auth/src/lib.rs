//! Warden Credential and Session Management
//!
//! This crate provides Argon2id password hashing and stateless
//! HS256 session tokens for Warden.

pub mod clock;
pub mod error;
pub mod password;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CredentialError, SessionError};
pub use password::{CredentialManager, HashParams};
pub use session::{Claims, SESSION_TTL_HOURS, SessionManager};
