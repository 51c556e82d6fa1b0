//! Application state

use std::sync::Arc;
use warden_core::AccountService;

/// Session cookie attributes
#[derive(Debug, Clone, Default)]
pub struct CookieSettings {
    /// Add the `Secure` attribute (only when served over HTTPS)
    pub secure: bool,
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub cookie: CookieSettings,
}

impl AppState {
    pub fn new(accounts: Arc<AccountService>, cookie: CookieSettings) -> Self {
        Self { accounts, cookie }
    }
}
