//! Closed error taxonomy for the auth boundary.
//!
//! Raw transport errors and HTTP bodies are translated into [`AuthError`]
//! in exactly one place ([`classify_response`] / [`classify_transport`]);
//! nothing downstream inspects status codes or response shapes.

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// Local validation failure; never reached the network.
    #[error("{0}")]
    Validation(String),
    #[error("An account with this email already exists")]
    DuplicateAccount,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Too many attempts. Please try again later")]
    RateLimited,
    #[error("Unable to connect to the server. Please check your internet connection")]
    Connectivity,
    #[error("Your session has expired. Please login again")]
    SessionExpired,
    #[error("Failed to restore your session. Please login again")]
    RestoreFailed,
    #[error("An unexpected error occurred. Please try again")]
    Unexpected,
}

/// Translate a non-success HTTP response into the closed taxonomy.
///
/// The body, when present, carries `{"error": {"message": ...}}`; a 400
/// mentioning "already taken" is the duplicate-account case (the message the
/// upstream identity provider emits).
#[must_use]
pub(crate) fn classify_response(status: StatusCode, body: &serde_json::Value) -> AuthError {
    let message = body
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .unwrap_or_default();

    match status {
        StatusCode::BAD_REQUEST => {
            if message.contains("already taken") || message.contains("Email or Username") {
                AuthError::DuplicateAccount
            } else if message.is_empty() {
                AuthError::Validation("Invalid email or password format".into())
            } else {
                AuthError::Validation(message.to_owned())
            }
        }
        StatusCode::UNAUTHORIZED => AuthError::InvalidCredentials,
        StatusCode::TOO_MANY_REQUESTS => AuthError::RateLimited,
        _ => AuthError::Unexpected,
    }
}

/// Translate a transport-level failure (no HTTP response at all).
#[must_use]
pub(crate) fn classify_transport(err: &reqwest::Error) -> AuthError {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        AuthError::Connectivity
    } else {
        AuthError::Unexpected
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
