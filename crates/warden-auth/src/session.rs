//! Session token management

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::SessionError;

/// Lifetime of an issued session, in hours
pub const SESSION_TTL_HOURS: i64 = 24;

/// Session claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Account role label
    pub role: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Issues and verifies HS256 session tokens
#[derive(Clone)]
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    /// Create a session manager using the system clock
    pub fn new(secret: &str) -> Result<Self, SessionError> {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    /// Create a session manager with an explicit clock
    ///
    /// An empty secret is refused here so a misconfigured process fails at
    /// startup rather than on its first request.
    pub fn with_clock(secret: &str, clock: Arc<dyn Clock>) -> Result<Self, SessionError> {
        if secret.trim().is_empty() {
            return Err(SessionError::MissingKey);
        }

        // Pinned to HS256 regardless of what the token header claims.
        // Expiry is checked in `verify` against the injected clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        })
    }

    /// Lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        Duration::hours(SESSION_TTL_HOURS)
    }

    /// Issue a token for an account
    pub fn issue(&self, account_id: &str, role: &str) -> Result<String, SessionError> {
        let now = self.clock.now();
        let exp = now + self.ttl();

        let claims = Claims {
            sub: account_id.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        debug!("Issuing session for account: {}", account_id);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(SessionError::Signing)
    }

    /// Verify a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims, SessionError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(classify)?;

        if self.clock.now().timestamp() >= token_data.claims.exp {
            return Err(SessionError::Expired);
        }

        Ok(token_data.claims)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> SessionError {
    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => SessionError::InvalidSignature,
        ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Malformed,
    }
}
