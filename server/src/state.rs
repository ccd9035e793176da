//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Users and sessions live in memory only: the relay has no database by
//! design, so a restart drops every account and token. Both tables sit
//! behind `Arc<RwLock<..>>` so connection tasks share them cheaply.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;

use crate::rate_limit::RateLimiter;

// =============================================================================
// USER TABLE
// =============================================================================

/// A registered account. Ids are sequential, starting at 1.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// In-memory user directory with email and username indexes.
#[derive(Default)]
pub struct UserTable {
    next_id: u64,
    by_id: HashMap<u64, UserRecord>,
    email_index: HashMap<String, u64>,
    username_index: HashMap<String, u64>,
}

impl UserTable {
    /// Insert a new user and return the assigned record.
    ///
    /// Returns `None` when the email or username is already taken.
    pub fn insert(&mut self, email: String, username: String, password_hash: String) -> Option<UserRecord> {
        if self.email_index.contains_key(&email) || self.username_index.contains_key(&username) {
            return None;
        }

        self.next_id += 1;
        let record = UserRecord { id: self.next_id, email: email.clone(), username: username.clone(), password_hash };
        self.email_index.insert(email, record.id);
        self.username_index.insert(username, record.id);
        self.by_id.insert(record.id, record.clone());
        Some(record)
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<&UserRecord> {
        self.by_id.get(&id)
    }

    /// Look up by login identifier: email first, then username.
    #[must_use]
    pub fn find_by_identifier(&self, identifier: &str) -> Option<&UserRecord> {
        self.email_index
            .get(identifier)
            .or_else(|| self.username_index.get(identifier))
            .and_then(|id| self.by_id.get(id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// =============================================================================
// SESSION TABLE
// =============================================================================

/// An issued auth token. Opaque to clients; checked on every `/api/users/me`
/// and websocket upgrade.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub user_id: u64,
    pub issued_at: Instant,
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<RwLock<UserTable>>,
    pub sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
    /// In-memory rate limiter for the credential endpoints.
    pub rate_limiter: RateLimiter,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(UserTable::default())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            rate_limiter: RateLimiter::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
