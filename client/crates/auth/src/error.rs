//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::HttpError;
use platform::storage::StorageError;
use thiserror::Error;

use crate::domain::token::DecodeError;
use crate::domain::value_object::Role;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Empty or whitespace credential
    #[error("Credential is empty")]
    InvalidCredential,

    /// Credential payload could not be read
    #[error("Credential could not be decoded: {0}")]
    Decode(#[from] DecodeError),

    /// Credential decoded but its expiry has passed
    #[error("Credential has expired")]
    Expired,

    /// Operation needs a signed-in session
    #[error("Not signed in")]
    NotAuthenticated,

    /// Role code that is neither `doctor` nor `patient`
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Signed in with a different role than the operation targets
    #[error("Signed in as {actual}, not {expected}")]
    RoleMismatch { expected: Role, actual: Role },

    /// Operation needs a role and none has been chosen
    #[error("No role selected yet")]
    RoleNotSelected,

    /// Backend unreachable or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered but refused the request
    #[error("Backend rejected the request ({kind}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        kind: ErrorKind,
        message: Option<String>,
    },

    /// Durable session storage failed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// Redirects did not settle on a screen
    #[error("Too many redirects")]
    RedirectLoop,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredential | AuthError::UnknownRole(_) => ErrorKind::BadRequest,
            AuthError::Decode(_) | AuthError::Expired | AuthError::NotAuthenticated => {
                ErrorKind::Unauthorized
            }
            AuthError::RoleMismatch { .. } | AuthError::RoleNotSelected => ErrorKind::Forbidden,
            AuthError::Network(_) => ErrorKind::ServiceUnavailable,
            AuthError::Rejected { kind, .. } => *kind,
            AuthError::Storage(_) | AuthError::RedirectLoop | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let message = self.user_message();
        let app = match self {
            AuthError::Decode(_) | AuthError::Expired | AuthError::NotAuthenticated => {
                AppError::sign_in_required(message)
            }
            AuthError::Network(_) => AppError::unreachable(message),
            _ => AppError::new(self.kind(), message),
        };
        app.with_detail(self)
    }

    /// Text for inline display. Backend messages pass through as-is.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            AuthError::Rejected { .. } | AuthError::Network(_) | AuthError::Internal(_) => {
                GENERIC_FAILURE.to_string()
            }
            AuthError::Storage(_) | AuthError::RedirectLoop => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }

    /// Log the error with appropriate level
    pub(crate) fn log(&self) {
        match self {
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Session storage error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Network(msg) => {
                tracing::warn!(error = %msg, "Backend unreachable");
            }
            AuthError::Rejected { kind, .. } if kind.is_server_error() => {
                tracing::warn!(kind = %kind, "Backend failed the request");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<HttpError> for AuthError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::InvalidUrl(url) => AuthError::Internal(format!("invalid URL {url}")),
            transport => AuthError::Network(transport.to_string()),
        }
    }
}
