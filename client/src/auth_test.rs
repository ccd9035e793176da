use tempfile::TempDir;

use crate::message::ChatMessage;
use crate::message::Transcript;

use super::*;

fn client() -> (TempDir, AuthClient) {
    let dir = TempDir::new().expect("temp dir");
    // port 9 is the discard service; nothing should ever reach it
    let config = ClientConfig::new("http://127.0.0.1:9", dir.path());
    let store = Arc::new(SessionStore::open(dir.path()).expect("open store"));
    (dir, AuthClient::new(config, store))
}

#[tokio::test]
async fn register_rejects_short_password_before_any_request() {
    let (_dir, mut auth) = client();
    let err = auth
        .register("alice@example.com", "short")
        .await
        .expect_err("five chars is too short");
    assert_eq!(
        err,
        AuthError::Validation("Password must be at least 6 characters long".into())
    );
    assert!(auth.user().is_none());
    assert!(auth.token().is_none());
}

#[tokio::test]
async fn restore_without_saved_token_is_a_no_op() {
    let (_dir, mut auth) = client();
    let restored = auth.restore_session().await.expect("no token, no request");
    assert!(restored.is_none());
}

#[test]
fn logout_clears_token_and_transcript() {
    let (_dir, mut auth) = client();
    auth.store.save_token("tok").expect("save token");
    let mut transcript = Transcript::new();
    transcript.push(ChatMessage::user("hi"));
    auth.store.save_transcript(&transcript).expect("save transcript");

    auth.logout();

    assert!(auth.token().is_none());
    assert!(auth.store.load_transcript().is_empty());
    assert!(auth.user().is_none());
}

#[test]
fn token_reflects_the_store() {
    let (_dir, auth) = client();
    assert!(auth.token().is_none());
    auth.store.save_token("tok").expect("save token");
    assert_eq!(auth.token(), Some("tok".to_owned()));
}
