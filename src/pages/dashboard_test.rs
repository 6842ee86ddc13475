use super::*;
use crate::state::store::MemorySessionStore;
use std::sync::Arc;

/// Client aimed at a port nothing listens on; any real request fails.
fn offline_client() -> ApiClient {
    ApiClient::new("http://127.0.0.1:9", Arc::new(MemorySessionStore::new())).unwrap()
}

fn result(sentiment: &str, confidence: f64) -> AnalysisResult {
    AnalysisResult { sentiment: sentiment.into(), confidence, timestamp: "2025-04-01T12:00:00".into() }
}

// =============================================================
// routing + validation
// =============================================================

#[test]
fn route_follows_authentication() {
    assert_eq!(AnalyzeRoute::for_session(true).path(), "/analyze");
    assert_eq!(AnalyzeRoute::for_session(false).path(), "/analyze-public");
}

#[test]
fn validate_analyze_input_rejects_blank_text() {
    assert_eq!(validate_analyze_input(""), Err(ValidationError::EmptyText));
    assert_eq!(validate_analyze_input(" \n\t"), Err(ValidationError::EmptyText));
    assert_eq!(validate_analyze_input(" great movie "), Ok(" great movie "));
    assert_eq!(ValidationError::EmptyText.to_string(), "Please enter some text to analyze");
}

#[tokio::test]
async fn submit_analysis_blank_text_never_sends() {
    let err = submit_analysis(&offline_client(), AnalyzeRoute::Public, "   ").await.unwrap_err();
    assert_eq!(err, SubmitError::Invalid(ValidationError::EmptyText));
}

#[tokio::test]
async fn submit_analysis_failure_uses_generic_message() {
    let err = submit_analysis(&offline_client(), AnalyzeRoute::Public, "hello").await.unwrap_err();
    assert_eq!(err.to_string(), ANALYZE_FAILED_MESSAGE);
}

// =============================================================
// panels
// =============================================================

#[tokio::test]
async fn guests_get_sample_panels_without_requests() {
    let client = offline_client();
    assert_eq!(load_model_info(&client, false).await, sample_model_info());
    let metrics = load_model_metrics(&client, false).await;
    assert!((metrics.accuracy - 0.9245).abs() < f64::EPSILON);
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_sample_panels() {
    let client = offline_client();
    assert_eq!(load_model_info(&client, true).await, sample_model_info());
    let metrics = load_model_metrics(&client, true).await;
    assert!((metrics.f1 - 0.9187).abs() < f64::EPSILON);
}

#[test]
fn sample_metrics_carry_current_timestamp() {
    let metrics = sample_model_metrics();
    assert!(!metrics.timestamp.is_empty());
    assert!(metrics.timestamp.contains('T'));
}

// =============================================================
// rendering
// =============================================================

#[test]
fn format_percent_uses_two_decimals() {
    assert_eq!(format_percent(0.9245), "92.45%");
    assert_eq!(format_percent(1.0), "100.00%");
    assert_eq!(format_percent(0.0), "0.00%");
}

#[test]
fn capitalize_first_letter() {
    assert_eq!(capitalize("positive"), "Positive");
    assert_eq!(capitalize("Negative"), "Negative");
    assert_eq!(capitalize(""), "");
}

#[test]
fn confidence_bar_is_proportional_and_clamped() {
    assert_eq!(confidence_bar(0.5), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
    assert_eq!(confidence_bar(1.7), format!("[{}]", "#".repeat(20)));
    assert_eq!(confidence_bar(-0.2), format!("[{}]", "-".repeat(20)));
    assert_eq!(confidence_bar(f64::NAN), format!("[{}]", "-".repeat(20)));
}

#[test]
fn render_result_shows_capitalized_sentiment_and_percentage() {
    let text = render_result(&result("positive", 0.9876));
    assert!(text.contains("Sentiment:   Positive"));
    assert!(text.contains("Confidence:  98.76%"));
    assert!(text.contains("Analyzed at: 2025-04-01T12:00:00"));
}

#[test]
fn render_model_info_marks_missing_fields() {
    let info = ModelInfo { model_type: Some("distilbert".into()), ..ModelInfo::default() };
    let text = render_model_info(&info);
    assert!(text.contains("Model Type:  distilbert"));
    assert!(text.contains("Hidden Size: unknown"));
}

#[test]
fn render_metrics_lists_all_scores() {
    let text = render_metrics(&ModelMetrics {
        accuracy: 0.9245,
        f1: 0.9187,
        precision: 0.9312,
        recall: 0.9065,
        timestamp: "t".into(),
    });
    for expected in ["Accuracy:     92.45%", "F1 Score:     91.87%", "Precision:    93.12%", "Recall:       90.65%"] {
        assert!(text.contains(expected), "missing {expected:?} in {text}");
    }
}

#[test]
fn render_header_names_user_or_guest() {
    let user = User { id: 1, email: "a@b.com".into(), created_at: None };
    assert!(render_header(Some(&user)).ends_with("a@b.com"));
    assert!(render_header(None).ends_with("guest"));
}

#[test]
fn render_account_includes_creation_time_when_known() {
    let mut user = User { id: 1, email: "a@b.com".into(), created_at: None };
    assert_eq!(render_account(&user), "a@b.com (id 1)");
    user.created_at = Some("2025-04-01T12:00:00".into());
    assert_eq!(render_account(&user), "a@b.com (id 1, member since 2025-04-01T12:00:00)");
}
