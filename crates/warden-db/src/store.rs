//! Account store abstraction

use async_trait::async_trait;

use crate::error::DbError;
use crate::models::{Account, NewAccount};
use crate::repository::Database;

/// Persistence operations the account flows depend on
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert an account, failing with [`DbError::Duplicate`] if the email is taken
    async fn insert_account(&self, account: NewAccount) -> Result<Account, DbError>;

    /// Find an account by email
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DbError>;

    /// Find an account by ID
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, DbError>;
}

#[async_trait]
impl AccountStore for Database {
    async fn insert_account(&self, account: NewAccount) -> Result<Account, DbError> {
        Database::insert_account(self, account).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
        self.get_account_by_email(email).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, DbError> {
        self.get_account_by_id(id).await
    }
}
