use super::*;

#[test]
fn derives_ws_scheme_from_api_url() {
    let config = ClientConfig::new("http://chat.local:1337", "/tmp/store");
    assert_eq!(config.ws_url, "ws://chat.local:1337");

    let config = ClientConfig::new("https://chat.local", "/tmp/store");
    assert_eq!(config.ws_url, "wss://chat.local");
}

#[test]
fn ws_endpoint_appends_path_and_token() {
    let config = ClientConfig::new("http://127.0.0.1:1337/", "/tmp/store");
    let endpoint = config
        .ws_endpoint("abc123")
        .expect("endpoint should build");
    assert_eq!(endpoint, "ws://127.0.0.1:1337/api/ws?token=abc123");
}

#[test]
fn ws_endpoint_rejects_non_ws_scheme() {
    let mut config = ClientConfig::new("http://127.0.0.1:1337", "/tmp/store");
    config.ws_url = "ftp://127.0.0.1".into();
    assert!(matches!(config.ws_endpoint("t"), Err(RealtimeError::InvalidUrl(_))));
}
