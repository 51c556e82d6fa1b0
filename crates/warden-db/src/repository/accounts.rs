//! Account operations

use chrono::Utc;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{Account, NewAccount};
use crate::repository::Database;

impl Database {
    /// Insert a new account
    ///
    /// The UNIQUE constraint on `email` decides conflicts, so two concurrent
    /// registrations of one address cannot both succeed.
    pub async fn insert_account(&self, account: NewAccount) -> Result<Account, DbError> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO accounts (id, first_name, last_name, email, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.role)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, "Account with this email already exists"))?;

        Ok(Account {
            id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            created_at: now,
        })
    }

    /// Get an account by email (exact, case-sensitive match)
    pub async fn get_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, created_at
            FROM accounts
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an account by ID
    pub async fn get_account_by_id(&self, id: &str) -> Result<Option<Account>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, created_at
            FROM accounts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHQ$aGFzaA".to_string(),
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::in_memory().await.unwrap();

        let account = db.insert_account(new_account("a@x.com")).await.unwrap();
        assert!(Uuid::parse_str(&account.id).is_ok());

        let by_email = db.get_account_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, account.id);
        assert_eq!(by_email.first_name, "Ada");
        assert_eq!(by_email.role, "user");
        assert_eq!(by_email.password_hash, account.password_hash);

        let by_id = db.get_account_by_id(&account.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let db = Database::in_memory().await.unwrap();

        db.insert_account(new_account("a@x.com")).await.unwrap();
        let result = db.insert_account(new_account("a@x.com")).await;
        assert!(matches!(result, Err(DbError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_email_is_case_sensitive() {
        let db = Database::in_memory().await.unwrap();

        db.insert_account(new_account("a@x.com")).await.unwrap();
        assert!(db.get_account_by_email("A@X.COM").await.unwrap().is_none());
        assert!(db.insert_account(new_account("A@x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_account() {
        let db = Database::in_memory().await.unwrap();

        assert!(db.get_account_by_email("nobody@x.com").await.unwrap().is_none());
        assert!(db.get_account_by_id("no-such-id").await.unwrap().is_none());
    }
}
