use std::time::Instant;

use super::*;

#[test]
fn generate_token_is_64_hex_chars_and_unique() {
    let a = generate_token();
    let b = generate_token();
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

#[tokio::test]
async fn create_then_validate_returns_user_id() {
    let state = AppState::new();
    let token = create_session(&state, 42).await;
    assert_eq!(validate_session(&state, &token).await, Some(42));
}

#[tokio::test]
async fn unknown_token_is_rejected() {
    let state = AppState::new();
    assert_eq!(validate_session(&state, "not-a-token").await, None);
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let state = AppState::new();
    let token = create_session(&state, 7).await;
    let after_expiry = Instant::now() + TOKEN_TTL + std::time::Duration::from_secs(1);
    assert_eq!(validate_session_at(&state, &token, after_expiry).await, None);
}

#[tokio::test]
async fn creating_a_session_sweeps_expired_ones() {
    let state = AppState::new();
    let start = Instant::now();
    let stale = create_session_at(&state, 1, start).await;

    let after_expiry = start + TOKEN_TTL + std::time::Duration::from_secs(1);
    let fresh = create_session_at(&state, 2, after_expiry).await;

    let sessions = state.sessions.read().await;
    assert!(!sessions.contains_key(&stale), "expired session should be gone");
    assert!(sessions.contains_key(&fresh));
    assert_eq!(sessions.len(), 1);
}
