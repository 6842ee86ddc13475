//! Registration form. A successful registration immediately logs in.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use super::{SubmitError, ValidationError};
use crate::net::api::AuthApi;
use crate::net::types::User;
use crate::state::session::{AuthError, AuthSession};

/// Minimum password length in Unicode scalar values (`char`s), not bytes or
/// UTF-16 code units.
pub const MIN_PASSWORD_LEN: usize = 6;
pub const REGISTER_FAILED_MESSAGE: &str = "Failed to register. Please try again.";
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your connection.";

/// Checks, in order: all fields present, password length, confirmation match.
///
/// # Errors
///
/// Returns the first [`ValidationError`] that applies.
pub fn validate_register_input(
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(String, String), ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Message shown for a failed registration (or its chained login).
#[must_use]
pub fn register_error_message(err: &AuthError) -> String {
    if let Some(detail) = err.detail() {
        return detail.to_owned();
    }
    if err.is_network() {
        return NO_RESPONSE_MESSAGE.to_owned();
    }
    REGISTER_FAILED_MESSAGE.to_owned()
}

/// Validate, register, then log in with the same credentials.
///
/// # Errors
///
/// Returns [`SubmitError::Invalid`] without touching the network when the
/// input is rejected locally, or [`SubmitError::Failed`] with the display
/// message when registration or the chained login fails.
pub async fn submit_register<A: AuthApi>(
    session: &AuthSession<A>,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<Option<User>, SubmitError> {
    let (email, password) = validate_register_input(email, password, confirm_password)?;
    session
        .register(&email, &password)
        .await
        .map_err(|e| SubmitError::Failed(register_error_message(&e)))
}
