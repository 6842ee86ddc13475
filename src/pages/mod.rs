//! View-layer handlers: form validation, submission, and text rendering.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each page validates user input locally before any network call, then
//! drives the auth session or the HTTP client and resolves failures into the
//! message shown to the user.

pub mod dashboard;
pub mod login;
pub mod register;

/// Client-side input errors. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please enter some text to analyze")]
    EmptyText,
}

/// Outcome of a failed form submission, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The request failed; holds the server `detail` or a fallback message.
    #[error("{0}")]
    Failed(String),
}
