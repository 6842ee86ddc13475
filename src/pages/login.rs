//! Login form: email + password exchanged for a session token.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::{SubmitError, ValidationError};
use crate::net::api::AuthApi;
use crate::net::types::User;
use crate::state::session::{AuthError, AuthSession};

pub const LOGIN_FAILED_MESSAGE: &str = "Failed to login. Please check your credentials.";

/// Returns the trimmed email and the password as typed.
///
/// # Errors
///
/// Returns [`ValidationError::MissingFields`] if either field is empty.
pub fn validate_login_input(email: &str, password: &str) -> Result<(String, String), ValidationError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Message shown for a failed login.
#[must_use]
pub fn login_error_message(err: &AuthError) -> String {
    err.detail().unwrap_or(LOGIN_FAILED_MESSAGE).to_owned()
}

/// Validate, then log in.
///
/// # Errors
///
/// Returns [`SubmitError::Invalid`] without touching the network when the
/// input is incomplete, or [`SubmitError::Failed`] with the display message
/// when the login fails.
pub async fn submit_login<A: AuthApi>(
    session: &AuthSession<A>,
    email: &str,
    password: &str,
) -> Result<Option<User>, SubmitError> {
    let (email, password) = validate_login_input(email, password)?;
    session
        .login(&email, &password)
        .await
        .map_err(|e| SubmitError::Failed(login_error_message(&e)))
}
