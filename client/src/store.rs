//! File-backed session persistence.
//!
//! Stands in for the browser's `localStorage`: one file per key under a
//! store directory. The auth token lives in `jwt`, the saved transcript in
//! `chat_messages.json`. Everything here is synchronous fs access; callers
//! treat persistence failures as non-fatal and log them.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::message::Transcript;

const TOKEN_FILE: &str = "jwt";
const TRANSCRIPT_FILE: &str = "chat_messages.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn transcript_path(&self) -> PathBuf {
        self.dir.join(TRANSCRIPT_FILE)
    }

    /// Persist the auth token, replacing any previous one.
    pub fn save_token(&self, token: &str) -> Result<(), StoreError> {
        fs::write(self.token_path(), token)?;
        Ok(())
    }

    /// The saved auth token, if any. Whitespace is trimmed; an empty file
    /// counts as no token.
    #[must_use]
    pub fn load_token(&self) -> Option<String> {
        let raw = fs::read_to_string(self.token_path()).ok()?;
        let token = raw.trim();
        if token.is_empty() { None } else { Some(token.to_owned()) }
    }

    /// Remove the saved token. Missing file is fine.
    pub fn clear_token(&self) -> Result<(), StoreError> {
        remove_if_present(&self.token_path())?;
        Ok(())
    }

    /// Persist the transcript as a JSON array.
    pub fn save_transcript(&self, transcript: &Transcript) -> Result<(), StoreError> {
        let json = serde_json::to_string(transcript)?;
        fs::write(self.transcript_path(), json)?;
        Ok(())
    }

    /// Load the saved transcript. A missing file yields an empty transcript;
    /// an unparseable one is discarded with a warning rather than surfaced,
    /// so a corrupt save never blocks startup.
    #[must_use]
    pub fn load_transcript(&self) -> Transcript {
        let path = self.transcript_path();
        let Ok(raw) = fs::read_to_string(&path) else {
            return Transcript::new();
        };
        match serde_json::from_str(&raw) {
            Ok(transcript) => transcript,
            Err(err) => {
                warn!(path = %path.display(), %err, "discarding unreadable transcript");
                if let Err(err) = remove_if_present(&path) {
                    warn!(path = %path.display(), %err, "failed to remove transcript");
                }
                Transcript::new()
            }
        }
    }

    /// Remove the saved transcript. Missing file is fine.
    pub fn clear_transcript(&self) -> Result<(), StoreError> {
        remove_if_present(&self.transcript_path())?;
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
