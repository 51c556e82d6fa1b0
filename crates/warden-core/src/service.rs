//! Account service: registration, login and session verification

use std::sync::Arc;
use tracing::{debug, info, warn};
use warden_auth::{Claims, CredentialError, CredentialManager, SessionManager};
use warden_db::{Account, AccountStore, NewAccount};

use crate::error::CoreError;
use crate::validation::{validate_email, validate_field, validate_password};

/// Plaintext behind the dummy hash checked when a login email is unknown
const DUMMY_PASSWORD: &str = "warden-unknown-account";

/// Registration input
#[derive(Debug, Clone)]
pub struct NewAccountRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

/// An account together with a freshly minted session token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub account: Account,
    pub token: String,
}

/// Composes the store, password hashing and session tokens
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    credentials: Arc<CredentialManager>,
    sessions: Arc<SessionManager>,
    dummy_hash: String,
}

impl AccountService {
    /// Create a new account service
    ///
    /// Computes the dummy hash up front, so this should run once at startup.
    pub fn new(
        store: Arc<dyn AccountStore>,
        credentials: CredentialManager,
        sessions: Arc<SessionManager>,
    ) -> Result<Self, CoreError> {
        let dummy_hash = credentials.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            store,
            credentials: Arc::new(credentials),
            sessions,
            dummy_hash,
        })
    }

    /// Session manager used for issuing and verifying tokens
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Register a new account and issue its first session
    pub async fn register(&self, request: NewAccountRequest) -> Result<IssuedSession, CoreError> {
        validate_field(&request.first_name, "firstName")?;
        validate_field(&request.last_name, "lastName")?;
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        validate_field(&request.role, "role")?;

        debug!("Registering account: {}", request.email);

        let password_hash = self.hash_password(request.password).await?;

        let account = self
            .store
            .insert_account(NewAccount {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                password_hash,
                role: request.role,
            })
            .await?;

        let token = self.sessions.issue(&account.id, &account.role)?;

        info!("Registered account {}", account.id);
        Ok(IssuedSession { account, token })
    }

    /// Check an email/password pair and issue a session
    ///
    /// Unknown email and wrong password both yield
    /// [`CoreError::InvalidCredentials`], and both pay for one hash check.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<IssuedSession, CoreError> {
        if email.is_empty() {
            return Err(CoreError::Validation("Missing required field: email".to_string()));
        }
        validate_password(password)?;

        let account = self.store.find_by_email(email).await?;

        let hash = match &account {
            Some(account) => account.password_hash.clone(),
            None => self.dummy_hash.clone(),
        };
        let password_valid = self.verify_password(password.to_string(), hash).await?;

        let account = match (account, password_valid) {
            (Some(account), true) => account,
            (None, _) => {
                debug!("Login rejected for {}: no such account", email);
                return Err(CoreError::InvalidCredentials);
            }
            (Some(_), false) => {
                debug!("Login rejected for {}: password mismatch", email);
                return Err(CoreError::InvalidCredentials);
            }
        };

        let token = self.sessions.issue(&account.id, &account.role)?;

        info!("Account {} logged in", account.id);
        Ok(IssuedSession { account, token })
    }

    /// Verify a session token
    pub fn verify(&self, token: &str) -> Result<Claims, CoreError> {
        self.sessions.verify(token).map_err(|e| {
            debug!("Session rejected: {}", e);
            CoreError::from(e)
        })
    }

    /// Resolve a session token to the account it was issued for
    pub async fn current_account(&self, token: &str) -> Result<Account, CoreError> {
        let claims = self.verify(token)?;

        match self.store.find_by_id(&claims.sub).await? {
            Some(account) => Ok(account),
            None => {
                warn!("Valid session for missing account {}", claims.sub);
                Err(CoreError::AccountNotFound)
            }
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, CoreError> {
        let credentials = self.credentials.clone();
        let hash = tokio::task::spawn_blocking(move || credentials.hash(&password))
            .await
            .map_err(|e| CredentialError::Hashing(format!("Task join error: {}", e)))??;
        Ok(hash)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, CoreError> {
        let credentials = self.credentials.clone();
        let valid = tokio::task::spawn_blocking(move || credentials.verify(&password, &hash))
            .await
            .map_err(|e| CredentialError::Hashing(format!("Task join error: {}", e)))?;
        Ok(valid)
    }
}
