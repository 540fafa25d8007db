//! Auth (Session) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Token codec, entities, routing rules, repository traits
//! - `application/` - Session manager, guards and use cases
//! - `infra/` - Backend API and durable storage implementations
//! - `presentation/` - Route table and navigator
//!
//! ## Features
//! - Google OAuth sign-in via backend-issued bearer credentials
//! - Session persisted across runs, re-validated against the clock
//! - One-time role selection (doctor or patient)
//! - Role-gated routes with a profile-completeness gate on dashboards
//!
//! ## Trust Model
//! - Credential payloads are read for routing only, never verified locally
//! - Expired or undecodable credentials are treated as signed out
//! - Profile checks fail closed: when in doubt, go to registration

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_manager::AuthSessionManager;
pub use error::{AuthError, AuthResult};
pub use infra::{HttpAccountApi, KvSessionStore};
pub use presentation::navigator::Navigator;

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}

#[cfg(test)]
mod tests;
