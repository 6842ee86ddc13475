//! Auth session manager: login, registration, profile refresh, logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owns the [`AuthState`] and is the only writer of the [`SessionStore`].
//! Views call into it and observe changes through [`AuthSession::subscribe`].
//!
//! CONCURRENCY
//! ===========
//! Operations suspend at every backend call and may overlap. Each login or
//! profile fetch captures the state generation when it starts and applies its
//! result only if that generation is still current; the check and the token
//! write happen under the same lock. A login that lost the race reports
//! [`AuthError::Superseded`].
//!
//! A login writes its token before its profile is confirmed. If that login is
//! superseded and nothing newer replaced the token, the store is reconciled
//! once no operation is in flight: it is restored to the token backing the
//! current user, or cleared when there is none.
//!
//! ERROR HANDLING
//! ==============
//! A failed profile fetch is not an error for callers: it collapses the
//! session to unauthenticated and clears the stored token. Every other
//! failure propagates unchanged.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use super::auth::{AuthAction, AuthState, reduce};
use super::store::{SessionStore, StoreError};
use crate::net::api::AuthApi;
use crate::net::error::ApiError;
use crate::net::types::User;

/// Failures surfaced by [`AuthSession`] operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A newer login or a logout started while this login was in flight.
    #[error("superseded by a newer session operation")]
    Superseded,
}

impl AuthError {
    /// Server-provided `detail` message, if the backend sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api(e) => e.detail(),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_network())
    }
}

/// State guarded by one lock so generation checks and store writes agree.
#[derive(Debug, Default)]
struct Inner {
    state: AuthState,
    /// Token the current `state.user` was loaded with.
    active_token: Option<String>,
    /// Token written by a login whose profile has not been applied yet.
    unconfirmed_token: Option<String>,
}

pub struct AuthSession<A> {
    api: A,
    store: Arc<dyn SessionStore>,
    inner: Mutex<Inner>,
    updates: watch::Sender<AuthState>,
}

impl<A: AuthApi> AuthSession<A> {
    /// Create an unauthenticated session. Call [`Self::bootstrap`] to pick up
    /// a stored token.
    pub fn new(api: A, store: Arc<dyn SessionStore>) -> Self {
        let (updates, _) = watch::channel(AuthState::default());
        Self { api, store, inner: Mutex::new(Inner::default()), updates }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AuthState {
        self.lock().state.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.lock().state.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().state.is_authenticated()
    }

    /// Receive every state transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.updates.subscribe()
    }

    /// Resume a stored session, if any.
    ///
    /// A token the backend no longer accepts is treated as no token.
    pub async fn bootstrap(&self) -> Option<User> {
        if self.store.get().is_none() {
            tracing::debug!("no stored session token");
            return None;
        }
        self.fetch_profile().await
    }

    /// Exchange credentials for a token, persist it, then load the profile.
    ///
    /// Returns `Ok(None)` when the token was issued but the profile could not
    /// be loaded; the session has then already been logged out.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Api`] if the backend rejects the credentials or is
    /// unreachable, [`AuthError::Store`] if the token cannot be persisted, and
    /// [`AuthError::Superseded`] if another session operation started before
    /// this one finished. A superseded login never leaves its token behind
    /// once the session settles.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        tracing::info!(%email, "login attempt");
        let generation = self.dispatch(AuthAction::Begin).generation;

        let token = match self.api.issue_token(email, password).await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(%email, error = %e, "login rejected");
                self.settle_failed_attempt(generation);
                return Err(e.into());
            }
        };

        {
            let mut inner = self.lock();
            if inner.state.generation != generation {
                tracing::info!(%email, "stale login result discarded");
                return Err(AuthError::Superseded);
            }
            if let Err(e) = self.store.set(&token) {
                tracing::warn!(%email, error = %e, "failed to persist session token");
                self.apply(&mut inner, AuthAction::AttemptFailed);
                self.reconcile(&mut inner);
                return Err(e.into());
            }
            inner.unconfirmed_token = Some(token.clone());
        }

        self.load_profile(generation, Some(token)).await
    }

    /// Create an account, then log in with the same credentials.
    ///
    /// Registration alone never authenticates.
    ///
    /// # Errors
    ///
    /// Returns the registration failure, or any failure of the chained login.
    pub async fn register(&self, email: &str, password: &str) -> Result<Option<User>, AuthError> {
        tracing::info!(%email, "registration attempt");
        if let Err(e) = self.api.register(email, password).await {
            tracing::warn!(%email, error = %e, "registration rejected");
            return Err(e.into());
        }
        self.login(email, password).await
    }

    /// Reload the profile for the stored token; logs out on any failure.
    ///
    /// Returns `None` as well when a newer operation superseded this one.
    pub async fn fetch_profile(&self) -> Option<User> {
        let (generation, token) = {
            let mut inner = self.lock();
            self.apply(&mut inner, AuthAction::Begin);
            (inner.state.generation, self.store.get())
        };
        self.load_profile(generation, token).await.unwrap_or_default()
    }

    /// Clear the stored token and the profile. Cannot fail.
    pub fn logout(&self) {
        let mut inner = self.lock();
        self.logout_locked(&mut inner);
        tracing::info!("logged out");
    }

    /// `token` is the token `/me` is expected to authenticate with.
    async fn load_profile(&self, generation: u64, token: Option<String>) -> Result<Option<User>, AuthError> {
        let result = self.api.current_user().await;

        let mut inner = self.lock();
        if inner.state.generation != generation {
            tracing::debug!("stale profile result discarded");
            self.reconcile(&mut inner);
            return Err(AuthError::Superseded);
        }
        match result {
            Ok(user) => {
                tracing::info!(user_id = user.id, email = %user.email, "session authenticated");
                if inner.unconfirmed_token == token {
                    inner.unconfirmed_token = None;
                }
                inner.active_token = token;
                self.apply(&mut inner, AuthAction::ProfileLoaded(user.clone()));
                Ok(Some(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile fetch failed; ending session");
                self.logout_locked(&mut inner);
                Ok(None)
            }
        }
    }

    fn settle_failed_attempt(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.state.generation == generation {
            self.apply(&mut inner, AuthAction::AttemptFailed);
        }
        self.reconcile(&mut inner);
    }

    /// Drop a token left behind by a superseded login once nothing is in
    /// flight, restoring the token that backs the current user.
    fn reconcile(&self, inner: &mut Inner) {
        if inner.state.loading() {
            return;
        }
        let Some(orphan) = inner.unconfirmed_token.take() else {
            return;
        };
        if self.store.get().as_deref() != Some(orphan.as_str()) {
            return;
        }
        match inner.active_token.clone() {
            Some(active) => {
                if let Err(e) = self.store.set(&active) {
                    tracing::warn!(error = %e, "failed to restore session token; ending session");
                    self.logout_locked(inner);
                    return;
                }
                tracing::info!("superseded login token replaced with active session token");
            }
            None => {
                self.store.clear();
                tracing::info!("superseded login token cleared");
            }
        }
    }

    fn logout_locked(&self, inner: &mut Inner) {
        self.store.clear();
        inner.active_token = None;
        inner.unconfirmed_token = None;
        self.apply(inner, AuthAction::LoggedOut);
    }

    fn dispatch(&self, action: AuthAction) -> AuthState {
        let mut inner = self.lock();
        self.apply(&mut inner, action);
        inner.state.clone()
    }

    fn apply(&self, inner: &mut Inner, action: AuthAction) {
        inner.state = reduce(&inner.state, action);
        self.updates.send_replace(inner.state.clone());
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
