//! HTTP client error taxonomy.

use serde_json::Value;

/// Errors produced by [`super::ApiClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response reached the client (connect failure, reset, DNS, ...).
    #[error("no response from server: {0}")]
    Network(String),

    /// The server responded with a non-success status.
    #[error("server responded with status {status}")]
    HttpStatus {
        status: u16,
        /// Human-readable `detail` field from a JSON error body, if present.
        detail: Option<String>,
        body: String,
    },

    /// A response arrived but its body could not be read or decoded into the
    /// expected type.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// The outgoing request could not be assembled.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// Build an [`ApiError::HttpStatus`] from a raw error response.
    #[must_use]
    pub fn from_response(status: u16, body: String) -> Self {
        let detail = extract_detail(&body);
        Self::HttpStatus { status, detail, body }
    }

    /// A status line arrived but the body could not be read.
    #[must_use]
    pub fn unreadable_body(status: u16, reason: &str) -> Self {
        Self::Decode(format!("status {status}: body unreadable: {reason}"))
    }

    /// Server-provided `detail` message, surfaced verbatim to users.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// Pull a string `detail` out of a JSON error body.
///
/// Structured details (e.g. validation error lists) yield `None` so callers
/// fall back to their generic message.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;
