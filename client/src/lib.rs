//! echo-chat client library.
//!
//! Three cooperating pieces, mirroring the frontend this replaces:
//! - [`SessionStore`]: file-backed persistence of the auth token and the
//!   chat transcript.
//! - [`AuthClient`]: REST login/register/restore against the relay's auth
//!   endpoints, with a closed error taxonomy produced at the network
//!   boundary.
//! - [`RealtimeClient`]: an owned websocket connection handle — created
//!   after login, destroyed on logout — that sends chat text and appends
//!   the relay's echoes to the transcript.

pub mod auth;
pub mod config;
pub mod error;
pub mod message;
pub mod realtime;
pub mod store;

pub use auth::{AuthClient, User};
pub use config::ClientConfig;
pub use error::AuthError;
pub use message::{ChatMessage, Origin, Transcript};
pub use realtime::{ConnectionState, RealtimeClient, RealtimeError, SendError};
pub use store::SessionStore;
