//! Session token management.
//!
//! Tokens are opaque 32-byte hex strings handed out on login/registration
//! and presented back as a bearer credential (HTTP) or as the websocket
//! handshake query parameter. They expire after seven days, the lifetime
//! the original deployment configured for its JWTs.

use std::fmt::Write;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::state::{AppState, SessionRecord};

/// Token lifetime: 7 days.
pub const TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Create a session for the given user, returning the token.
///
/// Piggybacks a sweep of expired sessions on the write lock, so the table
/// stays bounded by the number of logins within one TTL.
pub async fn create_session(state: &AppState, user_id: u64) -> String {
    create_session_at(state, user_id, Instant::now()).await
}

async fn create_session_at(state: &AppState, user_id: u64, now: Instant) -> String {
    let token = generate_token();
    let mut sessions = state.sessions.write().await;
    sessions.retain(|_, record| now.duration_since(record.issued_at) <= TOKEN_TTL);
    sessions.insert(token.clone(), SessionRecord { user_id, issued_at: now });
    token
}

/// Validate a token and return the associated `user_id`, if still live.
pub async fn validate_session(state: &AppState, token: &str) -> Option<u64> {
    validate_session_at(state, token, Instant::now()).await
}

/// Internal: validate with explicit "now" (for testing expiry).
async fn validate_session_at(state: &AppState, token: &str, now: Instant) -> Option<u64> {
    let sessions = state.sessions.read().await;
    let record = sessions.get(token)?;
    if now.duration_since(record.issued_at) > TOKEN_TTL {
        return None;
    }
    Some(record.user_id)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
