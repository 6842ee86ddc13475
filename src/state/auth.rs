//! Auth-session state for the current user.
//!
//! DESIGN
//! ======
//! State is an explicit value updated only through [`reduce`], so the
//! session manager, the CLI views, and tests all observe the same
//! transitions. `generation` increases whenever a new session operation
//! starts or the session ends; in-flight work compares against it to detect
//! that it has been superseded.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;

/// Coarse lifecycle of the session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    #[default]
    Unauthenticated,
    /// A login or profile fetch is in flight.
    Authenticating,
    Authenticated,
}

/// Authentication state tracking the current user and lifecycle phase.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub user: Option<User>,
    pub generation: u64,
}

impl AuthState {
    /// A fetched profile is the only proof of authentication.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.phase == AuthPhase::Authenticating
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AuthAction {
    /// A login or profile fetch started.
    Begin,
    ProfileLoaded(User),
    /// A login attempt failed before any token was stored.
    AttemptFailed,
    LoggedOut,
}

/// Pure transition function.
#[must_use]
pub fn reduce(state: &AuthState, action: AuthAction) -> AuthState {
    match action {
        AuthAction::Begin => AuthState {
            phase: AuthPhase::Authenticating,
            user: state.user.clone(),
            generation: state.generation + 1,
        },
        AuthAction::ProfileLoaded(user) => AuthState {
            phase: AuthPhase::Authenticated,
            user: Some(user),
            generation: state.generation,
        },
        AuthAction::AttemptFailed => AuthState {
            phase: if state.user.is_some() { AuthPhase::Authenticated } else { AuthPhase::Unauthenticated },
            user: state.user.clone(),
            generation: state.generation,
        },
        AuthAction::LoggedOut => AuthState {
            phase: AuthPhase::Unauthenticated,
            user: None,
            generation: state.generation + 1,
        },
    }
}
