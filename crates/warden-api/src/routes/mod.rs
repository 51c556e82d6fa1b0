//! API routes

mod accounts;
pub mod cookie;
mod health;
pub mod types;

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN, SET_COOKIE},
    },
};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .merge(health::routes())
        // Register / login / verify
        .merge(accounts::routes())
        .with_state(state)
}

/// Credentialed CORS for a single allowed origin
pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN])
        .expose_headers([SET_COOKIE])
        .allow_credentials(true)
}

/// Router over an in-memory store with cheap hashing parameters
#[cfg(test)]
pub(crate) async fn test_router() -> Router {
    use std::sync::Arc;
    use warden_auth::{CredentialManager, HashParams, SessionManager};
    use warden_core::AccountService;
    use warden_db::Database;

    use crate::state::CookieSettings;

    let db = Database::in_memory().await.unwrap();
    let credentials = CredentialManager::new(HashParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap();
    let sessions = Arc::new(SessionManager::new("test-secret-key").unwrap());
    let accounts = AccountService::new(Arc::new(db), credentials, sessions).unwrap();
    create_router(AppState::new(Arc::new(accounts), CookieSettings::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::ACCESS_CONTROL_ALLOW_CREDENTIALS};
    use axum::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
    use tower::ServiceExt;

    async fn app() -> Router {
        test_router().await
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .await
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let app = app()
            .await
            .layer(cors_layer(HeaderValue::from_static("http://localhost:3000")));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(), "true");
    }
}
