//! Scripted backend and fixtures shared by session and page tests.

use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::net::api::AuthApi;
use crate::net::error::ApiError;
use crate::net::types::User;
use crate::state::auth::AuthPhase;
use crate::state::session::AuthSession;
use crate::state::store::{MemorySessionStore, SessionStore};

// =========================================================================
// MockApi
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    IssueToken { email: String, password: String },
    Register { email: String, password: String },
    /// Token present in the store when `/me` was requested.
    CurrentUser { token: Option<String> },
}

pub struct MockApi {
    pub store: Arc<MemorySessionStore>,
    pub tokens: Mutex<Vec<Result<String, ApiError>>>,
    pub registrations: Mutex<Vec<Result<(), ApiError>>>,
    pub profiles: Mutex<Vec<Result<User, ApiError>>>,
    pub calls: Mutex<Vec<Call>>,
    /// Holds the next `issue_token` call open until notified.
    pub token_gate: Mutex<Option<Arc<Notify>>>,
    /// Holds the next `current_user` call open until notified.
    pub profile_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockApi {
    pub fn new(store: Arc<MemorySessionStore>) -> Self {
        Self {
            store,
            tokens: Mutex::new(Vec::new()),
            registrations: Mutex::new(Vec::new()),
            profiles: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            token_gate: Mutex::new(None),
            profile_gate: Mutex::new(None),
        }
    }

    pub fn token(self, result: Result<String, ApiError>) -> Self {
        self.tokens.lock().unwrap().push(result);
        self
    }

    pub fn registration(self, result: Result<(), ApiError>) -> Self {
        self.registrations.lock().unwrap().push(result);
        self
    }

    pub fn profile(self, result: Result<User, ApiError>) -> Self {
        self.profiles.lock().unwrap().push(result);
        self
    }

    pub fn gate_token(self, gate: Arc<Notify>) -> Self {
        *self.token_gate.lock().unwrap() = Some(gate);
        self
    }

    pub fn gate_profile(self, gate: Arc<Notify>) -> Self {
        *self.profile_gate.lock().unwrap() = Some(gate);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next<T>(queue: &Mutex<Vec<Result<T, ApiError>>>) -> Result<T, ApiError> {
        let mut queue = queue.lock().unwrap();
        if queue.is_empty() {
            Err(ApiError::Network("unscripted call".into()))
        } else {
            queue.remove(0)
        }
    }

    /// Results are drawn before waiting, so they follow call order.
    async fn hold(gate: &Mutex<Option<Arc<Notify>>>) {
        let gate = gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait::async_trait]
impl AuthApi for MockApi {
    async fn issue_token(&self, email: &str, password: &str) -> Result<String, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::IssueToken { email: email.into(), password: password.into() });
        let result = Self::next(&self.tokens);
        Self::hold(&self.token_gate).await;
        result
    }

    async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Register { email: email.into(), password: password.into() });
        Self::next(&self.registrations)
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::CurrentUser { token: self.store.get() });
        let result = Self::next(&self.profiles);
        Self::hold(&self.profile_gate).await;
        result
    }
}

pub fn user() -> User {
    User { id: 1, email: "a@b.com".into(), created_at: None }
}

pub fn other_user() -> User {
    User { id: 2, email: "c@d.com".into(), created_at: None }
}

pub fn rejected(status: u16, detail: &str) -> ApiError {
    ApiError::from_response(status, serde_json::json!({ "detail": detail }).to_string())
}

pub fn session(api: MockApi) -> AuthSession<MockApi> {
    let store = api.store.clone();
    AuthSession::new(api, store)
}

pub fn assert_logged_out(session: &AuthSession<MockApi>) {
    let state = session.state();
    assert_eq!(state.phase, AuthPhase::Unauthenticated);
    assert_eq!(state.user, None);
    assert!(!session.is_authenticated());
    assert_eq!(session.api().store.get(), None);
}
