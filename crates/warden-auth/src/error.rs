//! Credential and session error types

use thiserror::Error;

/// Failures of the password hashing policy
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParams(String),
}

/// Failures of session token issuance and verification
///
/// The verification variants stay distinct here; callers at the HTTP
/// boundary collapse them into a single unauthenticated response.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session signing key is not configured")]
    MissingKey,

    #[error("Token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Malformed token")]
    Malformed,
}
