//! HTTP client for the sentiment backend.
//!
//! Every request goes through [`ApiClient::request`], which attaches the
//! stored bearer token when one exists, and through `execute`, which logs the
//! exchange and maps non-2xx statuses to [`ApiError::HttpStatus`].
//!
//! ERROR HANDLING
//! ==============
//! Status codes and bodies are surfaced to callers unmodified. There are no
//! retries and no timeout policy beyond the transport defaults. Diagnostic
//! logging never fails the request: secrets are redacted and formatting
//! errors fall back to the raw text.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::types::{
    AnalysisResult, AnalyzeRequest, HealthStatus, ModelInfo, ModelMetrics, RegisterRequest, TokenResponse, User,
};
use crate::state::store::SessionStore;

/// Body fields whose values never reach the logs.
const REDACTED_KEYS: &[&str] = &["password", "access_token"];
const REDACTED: &str = "***";

// =============================================================================
// REQUEST / RESPONSE
// =============================================================================

/// Outgoing request body.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Json(Value),
    /// Sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
}

impl RequestBody {
    /// Serialize `value` as a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] if `value` cannot be serialized.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))
    }

    pub fn form<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Log-safe rendering with secret fields masked.
    fn redacted(&self) -> String {
        match self {
            Self::Json(value) => {
                let mut value = value.clone();
                redact_json(&mut value);
                value.to_string()
            }
            Self::Form(pairs) => pairs
                .iter()
                .map(|(k, v)| {
                    if REDACTED_KEYS.contains(&k.as_str()) {
                        format!("{k}={REDACTED}")
                    } else {
                        format!("{k}={v}")
                    }
                })
                .collect::<Vec<_>>()
                .join("&"),
        }
    }
}

/// A successful (2xx) response: status and raw body, unmodified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

// =============================================================================
// AUTH API SEAM
// =============================================================================

/// The backend calls the auth session manager depends on.
///
/// Implemented by [`ApiClient`]; tests substitute a scripted backend.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a bearer token via `POST /token`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the credentials are rejected.
    async fn issue_token(&self, email: &str, password: &str) -> Result<String, ApiError>;

    /// Create an account via `POST /register`. Does not authenticate.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the backend rejects the account.
    async fn register(&self, email: &str, password: &str) -> Result<(), ApiError>;

    /// Fetch the profile owning the stored token via `GET /me`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the token is not accepted.
    async fn current_user(&self) -> Result<User, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

/// Bearer-token HTTP client bound to one backend base URL.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend cannot be initialized.
    pub fn new(base_url: &str, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: crate::config::normalize_base_url(base_url), store })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request to `path`, attaching `Authorization: Bearer <token>`
    /// when the session store holds a token.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.endpoint(path));
        match self.store.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when no response arrives and
    /// [`ApiError::HttpStatus`] for non-2xx responses.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiError> {
        self.execute(Method::GET, path, None, None).await
    }

    /// `headers` are applied after the bearer token, so callers may override it.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when no response arrives and
    /// [`ApiError::HttpStatus`] for non-2xx responses.
    pub async fn post(
        &self,
        path: &str,
        body: RequestBody,
        headers: Option<HeaderMap>,
    ) -> Result<ApiResponse, ApiError> {
        self.execute(Method::POST, path, Some(body), headers).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        headers: Option<HeaderMap>,
    ) -> Result<ApiResponse, ApiError> {
        let mut builder = self.request(method, path);
        if let Some(headers) = headers {
            builder = builder.headers(headers);
        }
        let logged_body = body.as_ref().map(RequestBody::redacted);
        builder = match body {
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Form(pairs)) => builder.form(&pairs),
            None => builder,
        };
        let request = builder
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            headers = ?redacted_headers(request.headers()),
            body = logged_body.as_deref().unwrap_or(""),
            "sending request"
        );

        let method = request.method().clone();
        let url = request.url().clone();
        let response = self.http.execute(request).await.map_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed without response");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            tracing::warn!(%method, %url, status, error = %e, "response body unreadable");
            ApiError::unreadable_body(status, &e.to_string())
        })?;
        tracing::debug!(%method, %url, status, body = %redacted_text(&text), "response received");

        if !(200..300).contains(&status) {
            tracing::warn!(%method, %url, status, body = %redacted_text(&text), "error response");
            return Err(ApiError::from_response(status, text));
        }
        Ok(ApiResponse { status, body: text })
    }

    // =========================================================================
    // TYPED ENDPOINTS
    // =========================================================================

    /// `GET /model-info`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn model_info(&self) -> Result<ModelInfo, ApiError> {
        self.get("/model-info").await?.json()
    }

    /// `GET /model-metrics`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn model_metrics(&self) -> Result<ModelMetrics, ApiError> {
        self.get("/model-metrics").await?.json()
    }

    /// `POST /analyze` (requires a stored token).
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, ApiError> {
        let body = RequestBody::json(&AnalyzeRequest { text })?;
        self.post("/analyze", body, None).await?.json()
    }

    /// `POST /analyze-public`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn analyze_public(&self, text: &str) -> Result<AnalysisResult, ApiError> {
        let body = RequestBody::json(&AnalyzeRequest { text })?;
        self.post("/analyze-public", body, None).await?.json()
    }

    /// `GET /health`.
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and decode failures.
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get("/health").await?.json()
    }
}

#[async_trait::async_trait]
impl AuthApi for ApiClient {
    async fn issue_token(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let body = RequestBody::form([("username", email), ("password", password)]);
        let token: TokenResponse = self.post("/token", body, None).await?.json()?;
        if token.access_token.is_empty() {
            return Err(ApiError::Decode("empty access_token".to_owned()));
        }
        Ok(token.access_token)
    }

    async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = RequestBody::json(&RegisterRequest { email, password })?;
        self.post("/register", body, None).await?;
        Ok(())
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/me").await?.json()
    }
}

// =============================================================================
// LOG REDACTION
// =============================================================================

fn redact_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if REDACTED_KEYS.contains(&key.as_str()) {
                    *field = Value::String(REDACTED.to_owned());
                } else {
                    redact_json(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_json),
        _ => {}
    }
}

/// Redact a response body when it is JSON; other bodies are logged as-is.
fn redacted_text(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(mut value) => {
            redact_json(&mut value);
            value.to_string()
        }
        Err(_) => text.to_owned(),
    }
}

fn redacted_headers(headers: &HeaderMap) -> Vec<String> {
    headers
        .iter()
        .map(|(name, value)| {
            if *name == AUTHORIZATION {
                format!("{name}: Bearer {REDACTED}")
            } else {
                format!("{name}: {}", value.to_str().unwrap_or("<binary>"))
            }
        })
        .collect()
}
