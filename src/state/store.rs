//! Durable storage for the session bearer token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store is the single source of truth for "is someone signed in" at
//! start-up. The HTTP client reads it on every request; only the auth session
//! manager writes it. At most one token is held, under [`TOKEN_KEY`].

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Fixed storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Errors persisting a token.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Token storage keyed by [`TOKEN_KEY`].
///
/// An empty token is treated as no token.
pub trait SessionStore: Send + Sync {
    /// Current token, if any. Unreadable storage counts as absent.
    fn get(&self) -> Option<String>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the token cannot be persisted.
    fn set(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the stored token. Failures are logged, never returned.
    fn clear(&self);
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Persists the token as a single file named [`TOKEN_KEY`] in a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }

    fn io_error(path: &Path, source: io::Error) -> StoreError {
        StoreError::Io { path: path.to_path_buf(), source }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        let path = self.path();
        match std::fs::read_to_string(&path) {
            Ok(raw) => Some(raw.trim().to_owned()).filter(|t| !t.is_empty()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "session token unreadable");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        if token.is_empty() {
            self.clear();
            return Ok(());
        }
        std::fs::create_dir_all(&self.dir).map_err(|e| Self::io_error(&self.dir, e))?;

        // Temp file + rename: readers never observe a partial token.
        let path = self.path();
        let tmp = self.dir.join(format!("{TOKEN_KEY}.tmp"));
        std::fs::write(&tmp, token).map_err(|e| Self::io_error(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| Self::io_error(&path, e))?;
        tracing::debug!(path = %path.display(), "session token stored");
        Ok(())
    }

    fn clear(&self) {
        let path = self.path();
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "session token cleared"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to clear session token"),
        }
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned()).filter(|t| !t.is_empty())) }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned slot still holds a valid Option; keep using it.
        self.token.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.slot().clone()
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        *self.slot() = Some(token.to_owned()).filter(|t| !t.is_empty());
        Ok(())
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}
