//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Unavailable(#[from] sqlx::Error),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

impl DbError {
    /// Classify a failed insert, separating unique-constraint violations
    pub(crate) fn from_insert(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            return DbError::Duplicate(what.to_string());
        }
        DbError::Unavailable(err)
    }
}
