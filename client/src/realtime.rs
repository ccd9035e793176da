//! Websocket connection handle for the echo relay.
//!
//! A [`RealtimeClient`] owns one connection for the lifetime of a login.
//! Outgoing text goes over a bounded channel into an io task; everything the
//! relay echoes back comes out of the inbound receiver handed back by
//! [`RealtimeClient::connect`]. Both directions append to a shared
//! transcript, which is persisted through the session store after every
//! message.
//!
//! When the transport drops mid-session the io task re-dials up to
//! [`RECONNECT_ATTEMPTS`] times, [`RECONNECT_DELAY`] apart, surfacing
//! progress through a watch channel of [`ConnectionState`].

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::message::{ChatMessage, Transcript};
use crate::store::SessionStore;

/// How many times a lost connection is re-dialed before giving up.
pub const RECONNECT_ATTEMPTS: u32 = 5;
/// Pause between re-dial attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(1000);

const OUTBOUND_BUFFER: usize = 64;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    /// Closed deliberately; terminal.
    Disconnected,
    /// Gave up after exhausting reconnect attempts; terminal.
    Errored,
}

#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("Unable to connect to chat server")]
    ConnectFailed,
    #[error("invalid websocket url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SendError {
    #[error("Not connected to chat server")]
    NotConnected,
    #[error("Message cannot be empty")]
    EmptyMessage,
}

pub struct RealtimeClient {
    outbound: mpsc::Sender<String>,
    state_rx: watch::Receiver<ConnectionState>,
    transcript: Arc<Mutex<Transcript>>,
    store: Arc<SessionStore>,
    io: JoinHandle<()>,
}

impl RealtimeClient {
    /// Dial the relay and spawn the io task.
    ///
    /// The initial handshake uses the same bounded retry policy as
    /// post-drop reconnects: [`RECONNECT_ATTEMPTS`] tries,
    /// [`RECONNECT_DELAY`] apart, so a relay that comes up moments after
    /// the client still gets connected to.
    ///
    /// The returned receiver yields every message the relay echoes back,
    /// already appended to the transcript. The transcript starts from
    /// whatever the store has saved.
    ///
    /// # Errors
    ///
    /// [`RealtimeError::InvalidUrl`] if the configured websocket URL has the
    /// wrong scheme; [`RealtimeError::ConnectFailed`] once every handshake
    /// attempt has failed (server down, token rejected).
    pub async fn connect(
        config: &ClientConfig,
        token: &str,
        store: Arc<SessionStore>,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ChatMessage>), RealtimeError> {
        let url = config.ws_endpoint(token)?;
        let (state_tx, state_rx) = watch::channel(ConnectionState::Connecting);
        let socket = dial(&url, RECONNECT_ATTEMPTS)
            .await
            .ok_or(RealtimeError::ConnectFailed)?;
        let _ = state_tx.send(ConnectionState::Connected);
        info!("connected to relay");

        let transcript = Arc::new(Mutex::new(store.load_transcript()));
        let (out_tx, out_rx) = mpsc::channel(OUTBOUND_BUFFER);
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        let io = tokio::spawn(run_io(
            socket,
            url,
            out_rx,
            in_tx,
            state_tx,
            Arc::clone(&transcript),
            Arc::clone(&store),
        ));

        let client = Self { outbound: out_tx, state_rx, transcript, store, io };
        Ok((client, in_rx))
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// A watch receiver for reacting to connection state changes.
    #[must_use]
    pub fn state_watch(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Snapshot of the transcript, user messages and echoes interleaved in
    /// the order they were appended.
    #[must_use]
    pub fn transcript(&self) -> Transcript {
        lock_transcript(&self.transcript).clone()
    }

    /// Queue a message for the relay and append it to the transcript.
    ///
    /// The append is optimistic: the relay's echo arrives later as a
    /// separate server-origin message.
    ///
    /// # Errors
    ///
    /// [`SendError::EmptyMessage`] when the text is blank after trimming;
    /// [`SendError::NotConnected`] unless the connection is currently up.
    pub fn send_message(&self, text: &str) -> Result<ChatMessage, SendError> {
        if self.state() != ConnectionState::Connected {
            return Err(SendError::NotConnected);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(SendError::EmptyMessage);
        }

        self.outbound
            .try_send(text.to_owned())
            .map_err(|_| SendError::NotConnected)?;

        let message = ChatMessage::user(text);
        append_and_persist(&self.transcript, &self.store, message.clone());
        Ok(message)
    }

    /// Close the connection and wait for the io task to finish.
    pub async fn close(self) {
        drop(self.outbound);
        if let Err(err) = self.io.await {
            warn!(%err, "io task did not shut down cleanly");
        }
    }
}

/// Attempt the websocket handshake up to `attempts` times.
async fn dial(url: &str, attempts: u32) -> Option<WsStream> {
    for attempt in 1..=attempts {
        match connect_async(url).await {
            Ok((socket, _)) => return Some(socket),
            Err(err) => {
                warn!(attempt, %err, "websocket handshake failed");
                if attempt < attempts {
                    tokio::time::sleep(RECONNECT_DELAY).await;
                }
            }
        }
    }
    None
}

async fn run_io(
    mut socket: WsStream,
    url: String,
    mut outbound: mpsc::Receiver<String>,
    inbound: mpsc::UnboundedSender<ChatMessage>,
    state: watch::Sender<ConnectionState>,
    transcript: Arc<Mutex<Transcript>>,
    store: Arc<SessionStore>,
) {
    loop {
        tokio::select! {
            queued = outbound.recv() => {
                let Some(text) = queued else {
                    // handle dropped or closed; say goodbye and stop
                    if let Err(err) = socket.close(None).await {
                        debug!(%err, "close frame not delivered");
                    }
                    let _ = state.send(ConnectionState::Disconnected);
                    info!("disconnected from relay");
                    return;
                };
                if let Err(err) = socket.send(Message::Text(text.into())).await {
                    warn!(%err, "send failed, reconnecting");
                    let Some(reconnected) = reconnect(&url, &state).await else {
                        return;
                    };
                    socket = reconnected;
                }
            }
            incoming = socket.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let message = ChatMessage::server(text.as_str());
                        append_and_persist(&transcript, &store, message.clone());
                        if inbound.send(message).is_err() {
                            debug!("inbound receiver dropped");
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("connection lost, reconnecting");
                        let Some(reconnected) = reconnect(&url, &state).await else {
                            return;
                        };
                        socket = reconnected;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(%err, "transport error, reconnecting");
                        let Some(reconnected) = reconnect(&url, &state).await else {
                            return;
                        };
                        socket = reconnected;
                    }
                }
            }
        }
    }
}

/// Re-dial after a transport loss. On failure the state goes to `Errored`
/// and the io task should return.
async fn reconnect(url: &str, state: &watch::Sender<ConnectionState>) -> Option<WsStream> {
    let _ = state.send(ConnectionState::Connecting);
    match dial(url, RECONNECT_ATTEMPTS).await {
        Some(socket) => {
            info!("reconnected to relay");
            let _ = state.send(ConnectionState::Connected);
            Some(socket)
        }
        None => {
            warn!(attempts = RECONNECT_ATTEMPTS, "reconnect attempts exhausted");
            let _ = state.send(ConnectionState::Errored);
            None
        }
    }
}

fn append_and_persist(
    transcript: &Arc<Mutex<Transcript>>,
    store: &SessionStore,
    message: ChatMessage,
) {
    let mut guard = lock_transcript(transcript);
    guard.push(message);
    if let Err(err) = store.save_transcript(&guard) {
        warn!(%err, "failed to persist transcript");
    }
}

fn lock_transcript(transcript: &Arc<Mutex<Transcript>>) -> std::sync::MutexGuard<'_, Transcript> {
    transcript
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
#[path = "realtime_test.rs"]
mod tests;
