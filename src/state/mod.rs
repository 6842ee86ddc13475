//! Client-side session state.
//!
//! DESIGN
//! ======
//! `store` persists the bearer token, `auth` is the pure state/reducer pair,
//! and `session` drives the lifecycle against the backend.

pub mod auth;
pub mod session;
pub mod store;

pub use auth::{AuthAction, AuthPhase, AuthState};
pub use session::{AuthError, AuthSession};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};

#[cfg(test)]
pub(crate) mod test_helpers;
