use super::*;
use crate::net::ApiError;
use crate::state::store::{MemorySessionStore, SessionStore};
use crate::state::test_helpers::{Call, MockApi, assert_logged_out, rejected, session, user};
use std::sync::Arc;

// =============================================================
// validate_register_input
// =============================================================

#[test]
fn validate_register_input_accepts_matching_passwords() {
    assert_eq!(
        validate_register_input(" a@b.com ", "secret1", "secret1"),
        Ok(("a@b.com".to_owned(), "secret1".to_owned()))
    );
}

#[test]
fn validate_register_input_requires_all_fields() {
    assert_eq!(validate_register_input("", "secret1", "secret1"), Err(ValidationError::MissingFields));
    assert_eq!(validate_register_input("a@b.com", "", "secret1"), Err(ValidationError::MissingFields));
    assert_eq!(validate_register_input("a@b.com", "secret1", ""), Err(ValidationError::MissingFields));
}

#[test]
fn validate_register_input_rejects_short_password() {
    let err = validate_register_input("a@b.com", "12345", "12345").unwrap_err();
    assert_eq!(err, ValidationError::PasswordTooShort);
    assert_eq!(err.to_string(), "Password must be at least 6 characters long");
    assert!(validate_register_input("a@b.com", "123456", "123456").is_ok());
}

#[test]
fn password_length_counts_characters() {
    // Three astral-plane emoji: 3 chars, 12 UTF-8 bytes, 6 UTF-16 units.
    let emoji = "\u{1F600}\u{1F600}\u{1F600}";
    assert_eq!(validate_register_input("a@b.com", emoji, emoji), Err(ValidationError::PasswordTooShort));
    let accented = "\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}\u{e9}";
    assert!(validate_register_input("a@b.com", accented, accented).is_ok());
}

#[test]
fn validate_register_input_rejects_mismatch() {
    let err = validate_register_input("a@b.com", "secret1", "secret2").unwrap_err();
    assert_eq!(err, ValidationError::PasswordMismatch);
    assert_eq!(err.to_string(), "Passwords do not match");
}

#[test]
fn validate_register_input_checks_length_before_match() {
    assert_eq!(validate_register_input("a@b.com", "123", "456"), Err(ValidationError::PasswordTooShort));
}

// =============================================================
// register_error_message
// =============================================================

#[test]
fn register_error_message_variants() {
    let detail = AuthError::Api(rejected(400, "Email already registered"));
    assert_eq!(register_error_message(&detail), "Email already registered");

    let network = AuthError::Api(ApiError::Network("connection refused".into()));
    assert_eq!(register_error_message(&network), NO_RESPONSE_MESSAGE);

    let bare = AuthError::Api(ApiError::from_response(500, "Internal Server Error".into()));
    assert_eq!(register_error_message(&bare), REGISTER_FAILED_MESSAGE);
}

// =============================================================
// submit_register
// =============================================================

#[tokio::test]
async fn submit_register_mismatch_makes_no_call() {
    let store = Arc::new(MemorySessionStore::new());
    let session = session(MockApi::new(store));

    let err = submit_register(&session, "a@b.com", "secret1", "secret2").await.unwrap_err();

    assert_eq!(err.to_string(), "Passwords do not match");
    assert!(session.api().calls().is_empty());
}

#[tokio::test]
async fn submit_register_short_password_makes_no_call() {
    let store = Arc::new(MemorySessionStore::new());
    let session = session(MockApi::new(store));

    let err = submit_register(&session, "a@b.com", "12345", "12345").await.unwrap_err();

    assert_eq!(err, SubmitError::Invalid(ValidationError::PasswordTooShort));
    assert!(session.api().calls().is_empty());
}

#[tokio::test]
async fn submit_register_logs_in_after_registration() {
    let store = Arc::new(MemorySessionStore::new());
    let session = session(
        MockApi::new(store.clone())
            .registration(Ok(()))
            .token(Ok("T1".into()))
            .profile(Ok(user())),
    );

    let result = submit_register(&session, "a@b.com", "secret1", "secret1").await.unwrap();

    assert_eq!(result, Some(user()));
    assert_eq!(store.get().as_deref(), Some("T1"));
    assert_eq!(
        session.api().calls(),
        vec![
            Call::Register { email: "a@b.com".into(), password: "secret1".into() },
            Call::IssueToken { email: "a@b.com".into(), password: "secret1".into() },
            Call::CurrentUser { token: Some("T1".into()) },
        ]
    );
}

#[tokio::test]
async fn submit_register_surfaces_duplicate_email() {
    let store = Arc::new(MemorySessionStore::new());
    let session = session(MockApi::new(store).registration(Err(rejected(400, "Email already registered"))));

    let err = submit_register(&session, "a@b.com", "secret1", "secret1").await.unwrap_err();

    assert_eq!(err, SubmitError::Failed("Email already registered".into()));
    assert_logged_out(&session);
}
