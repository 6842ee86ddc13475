//! Networking modules for the sentiment backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` wraps every outbound HTTP call, `error` defines the failure taxonomy
//! surfaced to callers, and `types` defines the wire schema.

pub mod api;
pub mod error;
pub mod types;

pub use api::{ApiClient, ApiResponse, AuthApi, RequestBody};
pub use error::ApiError;
