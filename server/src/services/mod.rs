//! Domain services used by websocket and HTTP routes.
//!
//! Service modules own account and token logic so route handlers can stay
//! focused on protocol translation and auth plumbing.

pub mod auth;
pub mod session;
