//! REST auth client: login, register, session restore, logout.
//!
//! Wraps the relay's auth endpoints (`/api/auth/local`,
//! `/api/auth/local/register`, `/api/users/me`). Every failure surfaces as
//! an [`AuthError`] with a user-facing message; callers render the error
//! display string directly.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{classify_response, classify_transport, AuthError};
use crate::store::SessionStore;

/// Passwords shorter than this are rejected locally, before any request.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    jwt: String,
    user: User,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

pub struct AuthClient {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<SessionStore>,
    user: Option<User>,
}

impl AuthClient {
    #[must_use]
    pub fn new(config: ClientConfig, store: Arc<SessionStore>) -> Self {
        Self { http: reqwest::Client::new(), config, store, user: None }
    }

    /// The currently authenticated user, if any.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The saved auth token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.store.load_token()
    }

    /// Exchange credentials for a session token. On success the token is
    /// persisted and the user is cached on this client.
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<User, AuthError> {
        let url = format!("{}/api/auth/local", self.config.api_url);
        let body = LoginBody { identifier, password };
        let auth = self.post_auth(&url, &body).await?;
        self.adopt_session(auth)
    }

    /// Create an account and log in as it. The username is derived from the
    /// email's local part, matching what the signup form always sent.
    pub async fn register(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        let username = email.split('@').next().unwrap_or(email);
        let url = format!("{}/api/auth/local/register", self.config.api_url);
        let body = RegisterBody { username, email, password };
        let auth = self.post_auth(&url, &body).await?;
        self.adopt_session(auth)
    }

    /// Re-validate a saved token against `/api/users/me`.
    ///
    /// `Ok(None)` means no token was saved. A rejected or unverifiable token
    /// is cleared so the next startup goes straight to the login prompt.
    pub async fn restore_session(&mut self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.store.load_token() else {
            return Ok(None);
        };

        let url = format!("{}/api/users/me", self.config.api_url);
        let response = match self.http.get(&url).bearer_auth(&token).send().await {
            Ok(response) => response,
            Err(err) => {
                self.discard_token();
                let classified = classify_transport(&err);
                return Err(if classified == AuthError::Connectivity {
                    AuthError::Connectivity
                } else {
                    AuthError::RestoreFailed
                });
            }
        };

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.discard_token();
            return Err(AuthError::SessionExpired);
        }
        if !response.status().is_success() {
            self.discard_token();
            return Err(AuthError::RestoreFailed);
        }

        let user: User = response.json().await.map_err(|err| {
            warn!(%err, "unreadable restore response");
            AuthError::RestoreFailed
        })?;
        debug!(user_id = user.id, "session restored");
        self.user = Some(user.clone());
        Ok(Some(user))
    }

    /// Forget the session: clear the saved token and transcript, drop the
    /// cached user. Local and infallible; store errors are logged only.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear_token() {
            warn!(%err, "failed to clear token");
        }
        if let Err(err) = self.store.clear_transcript() {
            warn!(%err, "failed to clear transcript");
        }
        self.user = None;
    }

    async fn post_auth<B: Serialize>(&self, url: &str, body: &B) -> Result<AuthResponse, AuthError> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| classify_transport(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);
            return Err(classify_response(status, &body));
        }

        response.json().await.map_err(|err| {
            warn!(%err, "unreadable auth response");
            AuthError::Unexpected
        })
    }

    fn adopt_session(&mut self, auth: AuthResponse) -> Result<User, AuthError> {
        if let Err(err) = self.store.save_token(&auth.jwt) {
            warn!(%err, "failed to persist token; session will not survive restart");
        }
        debug!(user_id = auth.user.id, "authenticated");
        self.user = Some(auth.user.clone());
        Ok(auth.user)
    }

    fn discard_token(&mut self) {
        if let Err(err) = self.store.clear_token() {
            warn!(%err, "failed to clear token");
        }
        self.user = None;
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
