//! Auth routes — local login/registration and the current-user endpoint.
//!
//! The REST surface is wire-compatible with the identity provider the
//! original deployment used: `POST /api/auth/local`,
//! `POST /api/auth/local/register`, and `GET /api/users/me`, with the token
//! returned under the `jwt` key and errors wrapped in an
//! `{"error": {"status", "name", "message"}}` envelope.

use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::rate_limit::RateLimitError;
use crate::services::{auth as auth_svc, session};
use crate::state::{AppState, UserRecord};

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: u64,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub jwt: String,
    pub user: UserBody,
}

impl From<&UserRecord> for UserBody {
    fn from(user: &UserRecord) -> Self {
        Self { id: user.id, email: user.email.clone() }
    }
}

// =============================================================================
// ERROR ENVELOPE
// =============================================================================

/// API error carrying the HTTP status and a user-presentable message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    fn name(&self) -> &'static str {
        match self.status {
            StatusCode::BAD_REQUEST => "ApplicationError",
            StatusCode::UNAUTHORIZED => "UnauthorizedError",
            StatusCode::TOO_MANY_REQUESTS => "RateLimitError",
            _ => "InternalServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "status": self.status.as_u16(),
                "name": self.name(),
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<auth_svc::CredentialError> for ApiError {
    fn from(err: auth_svc::CredentialError) -> Self {
        use auth_svc::CredentialError::*;
        let status = match err {
            InvalidEmail | PasswordTooShort | AlreadyTaken => StatusCode::BAD_REQUEST,
            InvalidCredentials => StatusCode::UNAUTHORIZED,
        };
        Self::new(status, err.to_string())
    }
}

impl From<RateLimitError> for ApiError {
    fn from(err: RateLimitError) -> Self {
        Self::new(StatusCode::TOO_MANY_REQUESTS, err.to_string())
    }
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the `Authorization: Bearer` header.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: UserRecord,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let user_id = session::validate_session(&app_state, token)
            .await
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let user = auth_svc::get_user(&app_state, user_id)
            .await
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/local` — verify credentials, mint a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if body.identifier.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "identifier and password are required"));
    }
    // Same normalization the credential service applies, so case variants
    // of one identifier share a single budget.
    state
        .rate_limiter
        .check_and_record(&body.identifier.trim().to_ascii_lowercase())?;

    let user = auth_svc::verify_credentials(&state, &body.identifier, &body.password)
        .await
        .inspect_err(|_| tracing::warn!(identifier = %body.identifier, "auth: login rejected"))?;

    let token = session::create_session(&state, user.id).await;
    tracing::info!(user_id = %user.id, "auth: login");
    Ok(Json(AuthResponse { jwt: token, user: UserBody::from(&user) }))
}

/// `POST /api/auth/local/register` — create an account, mint a session token.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "email and password are required"));
    }
    state
        .rate_limiter
        .check_and_record(&body.email.trim().to_ascii_lowercase())?;

    let user = auth_svc::register_user(&state, &body.email, &body.username, &body.password)
        .await
        .inspect_err(|e| tracing::warn!(email = %body.email, error = %e, "auth: register rejected"))?;

    let token = session::create_session(&state, user.id).await;
    tracing::info!(user_id = %user.id, "auth: registered");
    Ok(Json(AuthResponse { jwt: token, user: UserBody::from(&user) }))
}

/// `GET /api/users/me` — return the current user.
pub async fn me(auth: AuthUser) -> Json<UserBody> {
    Json(UserBody::from(&auth.user))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
