//! Application Error - what the client reports when an operation fails
//!
//! Crate errors (`AuthError`, ...) are converted at the edge where a failure
//! reaches the user. An [`AppError`] keeps the user-facing text apart from the
//! diagnostic detail, which only goes to logs.

use super::kind::ErrorKind;

/// User-facing failure.
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::sign_in_required("Your session has ended")
///     .with_detail("exp 1700000000 is in the past");
/// assert_eq!(err.kind(), ErrorKind::Unauthorized);
/// assert_eq!(err.to_string(), "Your session has ended");
/// assert_eq!(err.action(), Some("Sign in again"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AppError {
    kind: ErrorKind,
    message: String,
    action: Option<&'static str>,
    detail: Option<String>,
}

/// Shorthand for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            action: None,
            detail: None,
        }
    }

    /// Input the user supplied (a form, a file, a URL) is unusable
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// No usable session
    pub fn sign_in_required(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message).with_action("Sign in again")
    }

    /// The backend could not be reached or did not answer in time
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
            .with_action("Check your connection and retry")
    }

    /// A fault on our side
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// Suggest a next step. Replaces any earlier suggestion.
    pub fn with_action(mut self, action: &'static str) -> Self {
        self.action = Some(action);
        self
    }

    /// Attach diagnostic text for logs. Never shown to users.
    pub fn with_detail(mut self, detail: impl std::fmt::Display) -> Self {
        self.detail = Some(detail.to_string());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn action(&self) -> Option<&'static str> {
        self.action
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Worth trying again without changing anything
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RequestTimeout | ErrorKind::TooManyRequests | ErrorKind::ServiceUnavailable
        )
    }

    /// Message plus the suggested next step, one per line
    pub fn report(&self) -> String {
        match self.action {
            Some(action) => format!("{}\n{action}.", self.message),
            None => self.message.clone(),
        }
    }
}
