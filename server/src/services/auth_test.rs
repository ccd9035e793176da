use super::*;

#[test]
fn normalize_email_lowercases_and_trims() {
    assert_eq!(normalize_email("  A@B.Com "), Some("a@b.com".to_owned()));
}

#[test]
fn normalize_email_rejects_malformed_addresses() {
    assert!(normalize_email("").is_none());
    assert!(normalize_email("no-at-sign").is_none());
    assert!(normalize_email("@host").is_none());
    assert!(normalize_email("user@").is_none());
    assert!(normalize_email("a@b@c").is_none());
}

#[test]
fn hash_password_is_deterministic_and_distinct() {
    assert_eq!(hash_password("secret1"), hash_password("secret1"));
    assert_ne!(hash_password("secret1"), hash_password("secret2"));
    assert_eq!(hash_password("secret1").len(), 64);
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let state = AppState::new();
    let created = register_user(&state, "a@b.com", "", "secret1")
        .await
        .expect("register should succeed");
    assert_eq!(created.id, 1);
    assert_eq!(created.email, "a@b.com");
    assert_eq!(created.username, "a");

    let verified = verify_credentials(&state, "a@b.com", "secret1")
        .await
        .expect("login should succeed");
    assert_eq!(verified.id, created.id);
}

#[tokio::test]
async fn register_rejects_short_password_and_bad_email() {
    let state = AppState::new();
    assert!(matches!(
        register_user(&state, "a@b.com", "", "short").await,
        Err(CredentialError::PasswordTooShort)
    ));
    assert!(matches!(
        register_user(&state, "not-an-email", "", "secret1").await,
        Err(CredentialError::InvalidEmail)
    ));
    assert!(state.users.read().await.is_empty());
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let state = AppState::new();
    register_user(&state, "a@b.com", "", "secret1")
        .await
        .expect("first register should succeed");
    assert!(matches!(
        register_user(&state, "A@B.com", "", "secret2").await,
        Err(CredentialError::AlreadyTaken)
    ));
}

#[tokio::test]
async fn login_accepts_username_as_identifier() {
    let state = AppState::new();
    register_user(&state, "a@b.com", "alice", "secret1")
        .await
        .expect("register should succeed");
    let user = verify_credentials(&state, "alice", "secret1")
        .await
        .expect("username login should succeed");
    assert_eq!(user.email, "a@b.com");
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_user() {
    let state = AppState::new();
    register_user(&state, "a@b.com", "", "secret1")
        .await
        .expect("register should succeed");
    assert!(matches!(
        verify_credentials(&state, "a@b.com", "wrong-pass").await,
        Err(CredentialError::InvalidCredentials)
    ));
    assert!(matches!(
        verify_credentials(&state, "nobody@b.com", "secret1").await,
        Err(CredentialError::InvalidCredentials)
    ));
}
