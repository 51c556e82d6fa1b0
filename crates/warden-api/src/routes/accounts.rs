//! Registration, login and session verification routes

use axum::{
    Json, Router,
    extract::{FromRequestParts, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, header::SET_COOKIE, request::Parts},
    routing::{get, post},
};
use tracing::debug;
use warden_core::{IssuedSession, NewAccountRequest};

use crate::error::ApiError;
use crate::state::AppState;

use super::cookie::{extract_session_token, session_cookie};
use super::types::{AccountResponse, LoginRequest, RegisterRequest};

// ==================== Session Extractor ====================

/// Raw session token presented by the caller (cookie or bearer header)
pub struct SessionToken(pub String);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match extract_session_token(&parts.headers) {
            Some(token) => Ok(SessionToken(token)),
            None => {
                debug!("No session token presented");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

fn body_or_bad_request<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|e| {
        debug!("Rejected request body: {}", e);
        ApiError::BadRequest("Invalid request body".to_string())
    })
}

/// Response headers carrying the session cookie
fn session_headers(state: &AppState, session: &IssuedSession) -> Result<HeaderMap, ApiError> {
    let max_age = state.accounts.sessions().ttl().num_seconds();
    let cookie = session_cookie(&state.cookie, &session.token, max_age)
        .map_err(|e| ApiError::Internal(format!("Invalid session cookie: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    Ok(headers)
}

// ==================== Routes ====================

/// POST /api/register
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<AccountResponse>), ApiError> {
    let request = body_or_bad_request(payload)?;

    let session = state
        .accounts
        .register(NewAccountRequest {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            role: request.role,
        })
        .await?;

    let headers = session_headers(&state, &session)?;
    Ok((StatusCode::CREATED, headers, Json(session.account.into())))
}

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<AccountResponse>), ApiError> {
    let request = body_or_bad_request(payload)?;

    let session = state
        .accounts
        .authenticate(&request.email, &request.password)
        .await?;

    let headers = session_headers(&state, &session)?;
    Ok((headers, Json(session.account.into())))
}

/// GET /api/verify
async fn verify(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Json<AccountResponse>, ApiError> {
    let account = state.accounts.current_account(&token).await?;
    Ok(Json(account.into()))
}

/// Create account routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/verify", get(verify))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header::CONTENT_TYPE, header::COOKIE};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::routes::test_router;

    async fn app() -> Router {
        test_router().await
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn verify_with_cookie(cookie: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri("/api/verify")
            .header(COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn registration(email: &str) -> Value {
        json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": email,
            "password": "secret123",
            "role": "user",
        })
    }

    /// `token=<value>` pair from a Set-Cookie header
    fn cookie_pair(response: &Response) -> String {
        let header = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        header.split(';').next().unwrap().to_string()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn test_register_sets_cookie_and_verifies() {
        let app = app().await;

        let response = app
            .clone()
            .oneshot(post_json("/api/register", registration("a@x.com")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Max-Age=86400"));

        let cookie = cookie_pair(&response);
        let token = cookie.trim_start_matches("token=").to_string();

        let body = body_bytes(response).await;
        let created: Value = serde_json::from_slice(&body).unwrap();
        assert!(created.get("token").is_none());
        assert!(created.get("password").is_none());
        assert!(created.get("passwordHash").is_none());
        assert!(!String::from_utf8_lossy(&body).contains(&token));
        assert_eq!(created["email"], "a@x.com");

        let response = app.oneshot(verify_with_cookie(&cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let verified: AccountResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(verified.id, created["id"].as_str().unwrap());
        assert_eq!(verified.role, "user");
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let app = app().await;

        let first = app
            .clone()
            .oneshot(post_json("/api/register", registration("a@x.com")))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(post_json("/api/register", registration("a@x.com")))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_bodies() {
        let app = app().await;

        let missing = app
            .clone()
            .oneshot(post_json("/api/register", json!({ "email": "a@x.com" })))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let malformed = Request::builder()
            .method("POST")
            .uri("/api/register")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(malformed).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login() {
        let app = app().await;
        app.clone()
            .oneshot(post_json("/api/register", registration("a@x.com")))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/login",
                json!({ "email": "a@x.com", "password": "secret123" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = cookie_pair(&response);
        let response = app.oneshot(verify_with_cookie(&cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_failures_are_identical() {
        let app = app().await;
        app.clone()
            .oneshot(post_json("/api/register", registration("a@x.com")))
            .await
            .unwrap();

        let wrong_password = app
            .clone()
            .oneshot(post_json(
                "/api/login",
                json!({ "email": "a@x.com", "password": "wrong" }),
            ))
            .await
            .unwrap();
        let unknown_email = app
            .oneshot(post_json(
                "/api/login",
                json!({ "email": "nobody@x.com", "password": "anything" }),
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
        assert!(wrong_password.headers().get(SET_COOKIE).is_none());
        assert_eq!(body_bytes(wrong_password).await, body_bytes(unknown_email).await);
    }

    #[tokio::test]
    async fn test_verify_rejections_are_identical() {
        let app = app().await;

        let missing = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/verify")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let empty = app.clone().oneshot(verify_with_cookie("token=")).await.unwrap();
        let garbage = app.oneshot(verify_with_cookie("token=not.a.jwt")).await.unwrap();

        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(empty.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

        let missing = body_bytes(missing).await;
        assert_eq!(missing, body_bytes(empty).await);
        assert_eq!(missing, body_bytes(garbage).await);
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let app = app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/register")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
