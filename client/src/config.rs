//! Client configuration — API base URL, websocket URL, store directory.
//!
//! All three come from the environment (`ECHO_API_URL`, `ECHO_WS_URL`,
//! `ECHO_STORE_DIR`); the websocket URL is derived from the API URL when not
//! set explicitly.

use std::path::PathBuf;

use crate::realtime::RealtimeError;

const DEFAULT_API_URL: &str = "http://127.0.0.1:1337";
const DEFAULT_STORE_DIR: &str = ".echo-chat";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for REST requests, e.g. `http://127.0.0.1:1337`.
    pub api_url: String,
    /// Base URL for the websocket connection, e.g. `ws://127.0.0.1:1337`.
    pub ws_url: String,
    /// Directory holding the session store.
    pub store_dir: PathBuf,
}

impl ClientConfig {
    /// Build a config from an API base URL, deriving the websocket URL.
    #[must_use]
    pub fn new(api_url: impl Into<String>, store_dir: impl Into<PathBuf>) -> Self {
        let api_url = api_url.into();
        let ws_url = ws_url_from_api(&api_url).unwrap_or_else(|| api_url.clone());
        Self { api_url, ws_url, store_dir: store_dir.into() }
    }

    /// Load from `ECHO_API_URL` / `ECHO_WS_URL` / `ECHO_STORE_DIR`.
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = std::env::var("ECHO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let store_dir = std::env::var("ECHO_STORE_DIR").unwrap_or_else(|_| DEFAULT_STORE_DIR.into());
        let mut config = Self::new(api_url, store_dir);
        if let Ok(ws_url) = std::env::var("ECHO_WS_URL") {
            config.ws_url = ws_url;
        }
        config
    }

    /// Full websocket endpoint carrying the handshake credential.
    pub fn ws_endpoint(&self, token: &str) -> Result<String, RealtimeError> {
        let base = self.ws_url.trim_end_matches('/');
        if !base.starts_with("ws://") && !base.starts_with("wss://") {
            return Err(RealtimeError::InvalidUrl(self.ws_url.clone()));
        }
        Ok(format!("{base}/api/ws?token={token}"))
    }
}

/// Swap an http(s) scheme for ws(s). Returns `None` for anything else.
fn ws_url_from_api(api_url: &str) -> Option<String> {
    if let Some(rest) = api_url.strip_prefix("http://") {
        return Some(format!("ws://{rest}"));
    }
    if let Some(rest) = api_url.strip_prefix("https://") {
        return Some(format!("wss://{rest}"));
    }
    None
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
