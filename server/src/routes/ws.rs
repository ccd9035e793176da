//! WebSocket handler — per-connection echo relay.
//!
//! DESIGN
//! ======
//! On upgrade, the handshake token is validated and the connection enters a
//! receive loop: every inbound Text payload is sent straight back to the
//! originating socket, verbatim. There is no fanout, no persistence, and no
//! acknowledgment — the relay contract is a pure echo.

use std::collections::HashMap;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::services::session;
use crate::state::AppState;

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    let Some(token) = params.get("token") else {
        return (StatusCode::UNAUTHORIZED, "token required").into_response();
    };

    let Some(user_id) = session::validate_session(&state, token).await else {
        return (StatusCode::UNAUTHORIZED, "invalid or expired token").into_response();
    };

    ws.on_upgrade(move |socket| run_echo(socket, user_id))
}

async fn run_echo(mut socket: WebSocket, user_id: u64) {
    let client_id = Uuid::new_v4();
    info!(%client_id, %user_id, "ws: client connected");

    while let Some(msg) = socket.recv().await {
        let Ok(msg) = msg else { break };
        match msg {
            Message::Text(text) => {
                debug!(%client_id, len = text.len(), "ws: echo");
                if socket.send(Message::Text(text)).await.is_err() {
                    warn!(%client_id, "ws: echo send failed");
                    break;
                }
            }
            Message::Close(_) => break,
            // Binary payloads are not part of the contract; Ping/Pong are
            // answered by the transport layer.
            _ => {}
        }
    }

    info!(%client_id, "ws: client disconnected");
}
