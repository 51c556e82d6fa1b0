//! Core error types

use thiserror::Error;
use warden_auth::{CredentialError, SessionError};
use warden_db::DbError;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Session account no longer exists")]
    AccountNotFound,

    #[error("Conflict: {0}")]
    StoreConflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(DbError),
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate(msg) => CoreError::StoreConflict(msg),
            other => CoreError::StoreUnavailable(other),
        }
    }
}
