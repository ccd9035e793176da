//! Credential service — registration and password verification.
//!
//! Accounts are held in the in-memory [`UserTable`]; passwords are stored as
//! SHA-256 digests. This stands in for a full identity provider: the relay
//! needs "a login that works", not a designed authentication protocol.

use sha2::{Digest, Sha256};

use crate::state::{AppState, UserRecord};

/// Minimum password length, enforced on registration.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("email must be a valid email")]
    InvalidEmail,
    #[error("password must be at least {MIN_PASSWORD_LEN} characters long")]
    PasswordTooShort,
    #[error("Email or Username are already taken")]
    AlreadyTaken,
    #[error("Invalid identifier or password")]
    InvalidCredentials,
}

/// Lowercase and structurally validate an email address.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    let bytes = hasher.finalize();
    bytes.iter().map(|b| format!("{b:02x}")).collect::<String>()
}

/// Register a new account and return its record.
pub async fn register_user(
    state: &AppState,
    email: &str,
    username: &str,
    password: &str,
) -> Result<UserRecord, CredentialError> {
    let email = normalize_email(email).ok_or(CredentialError::InvalidEmail)?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(CredentialError::PasswordTooShort);
    }

    let username = username.trim().to_owned();
    let username = if username.is_empty() {
        // Same fallback the reference frontend uses: the email local part.
        email.split('@').next().unwrap_or(&email).to_owned()
    } else {
        username
    };

    let mut users = state.users.write().await;
    users
        .insert(email, username, hash_password(password))
        .ok_or(CredentialError::AlreadyTaken)
}

/// Verify an identifier/password pair and return the matching user.
pub async fn verify_credentials(
    state: &AppState,
    identifier: &str,
    password: &str,
) -> Result<UserRecord, CredentialError> {
    let identifier = identifier.trim().to_ascii_lowercase();
    let users = state.users.read().await;
    let user = users
        .find_by_identifier(&identifier)
        .ok_or(CredentialError::InvalidCredentials)?;

    if user.password_hash != hash_password(password) {
        return Err(CredentialError::InvalidCredentials);
    }
    Ok(user.clone())
}

/// Fetch a user by id (used by `/api/users/me`).
pub async fn get_user(state: &AppState, user_id: u64) -> Option<UserRecord> {
    let users = state.users.read().await;
    users.get(user_id).cloned()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
