use axum::extract::State;
use axum::http::StatusCode;

use super::*;

async fn register_ok(state: &AppState, email: &str, password: &str) -> AuthResponse {
    let body = RegisterRequest { username: String::new(), email: email.to_owned(), password: password.to_owned() };
    register(State(state.clone()), Json(body))
        .await
        .expect("register should succeed")
        .0
}

async fn login_err(state: &AppState, identifier: &str, password: &str) -> ApiError {
    let body = LoginRequest { identifier: identifier.to_owned(), password: password.to_owned() };
    login(State(state.clone()), Json(body))
        .await
        .expect_err("login should fail")
}

#[tokio::test]
async fn register_returns_token_and_user() {
    let state = AppState::new();
    let resp = register_ok(&state, "a@b.com", "secret1").await;
    assert_eq!(resp.user.id, 1);
    assert_eq!(resp.user.email, "a@b.com");
    assert_eq!(resp.jwt.len(), 64);
}

#[tokio::test]
async fn register_duplicate_email_is_400_with_taken_message() {
    let state = AppState::new();
    register_ok(&state, "a@b.com", "secret1").await;

    let body = RegisterRequest { username: String::new(), email: "a@b.com".into(), password: "secret2".into() };
    let err = register(State(state.clone()), Json(body))
        .await
        .expect_err("duplicate register should fail");
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert!(err.message.contains("already taken"));
}

#[tokio::test]
async fn register_short_password_is_400() {
    let state = AppState::new();
    let body = RegisterRequest { username: String::new(), email: "a@b.com".into(), password: "short".into() };
    let err = register(State(state.clone()), Json(body))
        .await
        .expect_err("short password should fail");
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_wrong_password_is_401() {
    let state = AppState::new();
    register_ok(&state, "a@b.com", "secret1").await;
    let err = login_err(&state, "a@b.com", "wrong-pass").await;
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_unknown_identifier_is_401() {
    let state = AppState::new();
    let err = login_err(&state, "nobody@b.com", "secret1").await;
    assert_eq!(err.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_empty_fields_are_400_without_counting_against_limit() {
    let state = AppState::new();
    let err = login_err(&state, "", "").await;
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn repeated_login_attempts_hit_the_rate_limit() {
    let state = AppState::new();
    register_ok(&state, "a@b.com", "secret1").await;

    // Default per-identifier limit is 5/min; registration consumed one.
    for _ in 0..4 {
        let err = login_err(&state, "a@b.com", "wrong-pass").await;
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
    let err = login_err(&state, "a@b.com", "wrong-pass").await;
    assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn case_variants_of_one_identifier_share_a_rate_limit_budget() {
    let state = AppState::new();
    register_ok(&state, "a@b.com", "secret1").await;

    // Default per-identifier limit is 5/min; registration consumed one.
    for identifier in ["A@B.com", "a@B.COM", "A@b.Com", "a@b.com"] {
        let err = login_err(&state, identifier, "wrong-pass").await;
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
    let err = login_err(&state, "A@B.COM", "wrong-pass").await;
    assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn me_returns_current_user_for_valid_token() {
    let state = AppState::new();
    let resp = register_ok(&state, "a@b.com", "secret1").await;

    let user_id = crate::services::session::validate_session(&state, &resp.jwt)
        .await
        .expect("token should validate");
    assert_eq!(user_id, resp.user.id);

    let user = crate::services::auth::get_user(&state, user_id)
        .await
        .expect("user should exist");
    let me_body = me(AuthUser { user, token: resp.jwt }).await.0;
    assert_eq!(me_body.id, 1);
    assert_eq!(me_body.email, "a@b.com");
}
