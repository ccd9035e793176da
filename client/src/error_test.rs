use serde_json::json;

use super::*;

fn body(message: &str) -> serde_json::Value {
    json!({ "error": { "status": 400, "name": "ApplicationError", "message": message } })
}

#[test]
fn bad_request_with_taken_message_is_duplicate_account() {
    let err = classify_response(StatusCode::BAD_REQUEST, &body("Email or Username are already taken"));
    assert_eq!(err, AuthError::DuplicateAccount);
}

#[test]
fn bad_request_with_server_message_is_validation() {
    let err = classify_response(StatusCode::BAD_REQUEST, &body("password must be at least 6 characters long"));
    assert_eq!(err, AuthError::Validation("password must be at least 6 characters long".into()));
}

#[test]
fn bad_request_without_message_gets_generic_validation_text() {
    let err = classify_response(StatusCode::BAD_REQUEST, &serde_json::Value::Null);
    assert_eq!(err, AuthError::Validation("Invalid email or password format".into()));
}

#[test]
fn unauthorized_is_invalid_credentials() {
    let err = classify_response(StatusCode::UNAUTHORIZED, &serde_json::Value::Null);
    assert_eq!(err, AuthError::InvalidCredentials);
}

#[test]
fn too_many_requests_is_rate_limited() {
    let err = classify_response(StatusCode::TOO_MANY_REQUESTS, &serde_json::Value::Null);
    assert_eq!(err, AuthError::RateLimited);
}

#[test]
fn other_statuses_are_unexpected() {
    let err = classify_response(StatusCode::INTERNAL_SERVER_ERROR, &serde_json::Value::Null);
    assert_eq!(err, AuthError::Unexpected);
}
