//! echo-chat relay service.
//!
//! REST auth endpoints plus a websocket relay that echoes every received
//! message back to the sender. Exposed as a library so integration tests can
//! assemble the router against an ephemeral listener.

pub mod rate_limit;
pub mod routes;
pub mod services;
pub mod state;
