//! Client configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8001";
pub const API_URL_VAR: &str = "SENTIMENT_API_URL";
pub const SESSION_DIR_VAR: &str = "SENTIMENT_SESSION_DIR";

/// Directory used when no platform config directory can be resolved.
const FALLBACK_SESSION_DIR: &str = ".sentiment-client";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub base_url: String,
    /// Directory holding the persisted session token.
    pub session_dir: PathBuf,
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `SENTIMENT_API_URL`: default `http://localhost:8001`
    /// - `SENTIMENT_SESSION_DIR`: default platform config dir
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env_non_empty(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let session_dir = env_non_empty(SESSION_DIR_VAR).map_or_else(default_session_dir, PathBuf::from);
        Self::new(&base_url, session_dir)
    }

    #[must_use]
    pub fn new(base_url: &str, session_dir: PathBuf) -> Self {
        Self { base_url: normalize_base_url(base_url), session_dir }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    let Ok(raw) = std::env::var(key) else {
        return None;
    };
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

pub(crate) fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

/// Platform config directory for the client, e.g. `~/.config/sentiment-client`.
#[must_use]
pub fn default_session_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "sentiment-client")
        .map_or_else(|| PathBuf::from(FALLBACK_SESSION_DIR), |dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
