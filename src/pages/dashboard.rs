//! Dashboard: sentiment analysis plus model info and metrics panels.
//!
//! Signed-in users analyze through `/analyze` and see live model info and
//! metrics; everyone else goes through `/analyze-public` and sees the
//! built-in sample data. Panel fetch failures also fall back to the sample.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use super::{SubmitError, ValidationError};
use crate::net::api::ApiClient;
use crate::net::types::{AnalysisResult, ModelInfo, ModelMetrics, User};

pub const ANALYZE_FAILED_MESSAGE: &str = "Failed to analyze sentiment. Please try again.";

const CONFIDENCE_BAR_WIDTH: usize = 20;
const UNKNOWN: &str = "unknown";

/// Which analysis endpoint a request goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalyzeRoute {
    Authenticated,
    Public,
}

impl AnalyzeRoute {
    #[must_use]
    pub fn for_session(authenticated: bool) -> Self {
        if authenticated { Self::Authenticated } else { Self::Public }
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Authenticated => "/analyze",
            Self::Public => "/analyze-public",
        }
    }
}

/// # Errors
///
/// Returns [`ValidationError::EmptyText`] for empty or whitespace-only text.
pub fn validate_analyze_input(text: &str) -> Result<&str, ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    Ok(text)
}

/// Validate, then analyze `text` through the route matching the session.
///
/// # Errors
///
/// Returns [`SubmitError::Invalid`] without a network call for blank text,
/// or [`SubmitError::Failed`] when the request fails.
pub async fn submit_analysis(api: &ApiClient, route: AnalyzeRoute, text: &str) -> Result<AnalysisResult, SubmitError> {
    let text = validate_analyze_input(text)?;
    let result = match route {
        AnalyzeRoute::Authenticated => api.analyze(text).await,
        AnalyzeRoute::Public => api.analyze_public(text).await,
    };
    result.map_err(|e| {
        tracing::warn!(route = route.path(), status = ?e.status(), error = %e, "sentiment analysis failed");
        SubmitError::Failed(ANALYZE_FAILED_MESSAGE.to_owned())
    })
}

pub async fn load_model_info(api: &ApiClient, authenticated: bool) -> ModelInfo {
    if !authenticated {
        return sample_model_info();
    }
    api.model_info().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "model info unavailable; showing sample data");
        sample_model_info()
    })
}

pub async fn load_model_metrics(api: &ApiClient, authenticated: bool) -> ModelMetrics {
    if !authenticated {
        return sample_model_metrics();
    }
    api.model_metrics().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "model metrics unavailable; showing sample data");
        sample_model_metrics()
    })
}

// =============================================================================
// SAMPLE DATA
// =============================================================================

#[must_use]
pub fn sample_model_info() -> ModelInfo {
    ModelInfo {
        model_type: Some("distilbert".to_owned()),
        hidden_size: Some(768),
        num_labels: Some(2),
        vocab_size: Some(30522),
        device: Some("cpu".to_owned()),
    }
}

/// Sample metrics stamped with the current time.
#[must_use]
pub fn sample_model_metrics() -> ModelMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    ModelMetrics { accuracy: 0.9245, f1: 0.9187, precision: 0.9312, recall: 0.9065, timestamp }
}

// =============================================================================
// RENDERING
// =============================================================================

/// `0.92456` -> `"92.46%"`.
#[must_use]
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fixed-width bar filled in proportion to `confidence` (clamped to `[0, 1]`).
#[must_use]
pub fn confidence_bar(confidence: f64) -> String {
    let clamped = if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = (clamped * CONFIDENCE_BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(CONFIDENCE_BAR_WIDTH - filled))
}

#[must_use]
pub fn render_header(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("Sentiment Analysis Dashboard · {}", user.email),
        None => "Sentiment Analysis Dashboard · guest".to_owned(),
    }
}

/// One-line account summary for `whoami`.
#[must_use]
pub fn render_account(user: &User) -> String {
    match user.created_at.as_deref() {
        Some(created_at) => format!("{} (id {}, member since {created_at})", user.email, user.id),
        None => format!("{} (id {})", user.email, user.id),
    }
}

#[must_use]
pub fn render_result(result: &AnalysisResult) -> String {
    format!(
        "Analysis Result\n  Sentiment:   {}\n  Confidence:  {}\n  {}\n  Analyzed at: {}",
        capitalize(&result.sentiment),
        format_percent(result.confidence),
        confidence_bar(result.confidence),
        result.timestamp,
    )
}

#[must_use]
pub fn render_model_info(info: &ModelInfo) -> String {
    fn or_unknown<T: ToString>(value: Option<&T>) -> String {
        value.map_or_else(|| UNKNOWN.to_owned(), ToString::to_string)
    }

    format!(
        "Model Information\n  Model Type:  {}\n  Hidden Size: {}\n  Labels:      {}\n  Vocab Size:  {}\n  Device:      {}",
        or_unknown(info.model_type.as_ref()),
        or_unknown(info.hidden_size.as_ref()),
        or_unknown(info.num_labels.as_ref()),
        or_unknown(info.vocab_size.as_ref()),
        or_unknown(info.device.as_ref()),
    )
}

#[must_use]
pub fn render_metrics(metrics: &ModelMetrics) -> String {
    format!(
        "Performance Metrics\n  Accuracy:     {}\n  F1 Score:     {}\n  Precision:    {}\n  Recall:       {}\n  Last updated: {}",
        format_percent(metrics.accuracy),
        format_percent(metrics.f1),
        format_percent(metrics.precision),
        format_percent(metrics.recall),
        metrics.timestamp,
    )
}
