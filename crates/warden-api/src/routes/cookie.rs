//! Session cookie transport

use axum::http::{
    HeaderMap, HeaderValue,
    header::{AUTHORIZATION, COOKIE, InvalidHeaderValue},
};

use crate::state::CookieSettings;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "token";

/// Build an `HttpOnly` cookie holding the session token
pub fn session_cookie(
    settings: &CookieSettings,
    token: &str,
    max_age_secs: i64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if settings.secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Extract the session token from the cookie, falling back to a bearer header
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            if let Some((key, val)) = pair.trim().split_once('=')
                && key.trim() == SESSION_COOKIE_NAME
            {
                return Some(val.trim().to_string());
            }
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}
