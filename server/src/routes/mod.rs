//! Router assembly.
//!
//! Binds the auth REST endpoints and the websocket echo relay under a single
//! Axum router, with one CORS layer configured from `ALLOWED_ORIGINS`. The
//! original deployment carried two divergent copies of its CORS config; this
//! router is deliberately the only place the policy exists.

pub mod auth;
pub mod ws;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/local", post(auth::login))
        .route("/api/auth/local/register", post(auth::register))
        .route("/api/users/me", get(auth::me))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(cors_layer())
        .with_state(state)
}

/// CORS policy from the `ALLOWED_ORIGINS` env var (comma-separated).
///
/// With an explicit origin list the layer also allows credentials; when the
/// var is unset the layer falls back to permissive `Any` (credentials are
/// forbidden with a wildcard origin, so they stay off in that mode).
fn cors_layer() -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
    ];
    let headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        header::ORIGIN,
        header::ACCEPT,
        header::CACHE_CONTROL,
        HeaderName::from_static("x-requested-with"),
    ];

    let origins: Vec<HeaderValue> = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
                .collect()
        })
        .unwrap_or_default();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
    }
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
