//! Wire DTOs for the sentiment backend.
//!
//! DESIGN
//! ======
//! Request types borrow their fields so callers never clone credentials just
//! to serialize them. Response types are lenient about optional metadata the
//! backend may add or omit.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// The authenticated user as returned by `GET /me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Account creation time as sent by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of a successful `POST /token`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
}

/// Result of `POST /analyze` or `POST /analyze-public`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// `"positive"` or `"negative"`.
    pub sentiment: String,
    /// Probability of the reported label in `[0, 1]`.
    pub confidence: f64,
    pub timestamp: String,
}

/// Display-only model metadata from `GET /model-info`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub hidden_size: Option<u64>,
    #[serde(default)]
    pub num_labels: Option<u64>,
    #[serde(default)]
    pub vocab_size: Option<u64>,
    #[serde(default)]
    pub device: Option<String>,
}

/// Evaluation metrics from `GET /model-metrics`. Scores are fractions in `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
    pub timestamp: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}
