//! Profile Completeness
//!
//! A role dashboard only renders once the role's profile exists. The probe
//! result keeps "not there" apart from "could not tell", but both send the
//! user to registration.

use serde_json::Value as JsonValue;

use crate::domain::route::AuthorizationDecision;
use crate::domain::value_object::Role;

/// What the backend said about a profile
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileStatus {
    /// Profile document as returned under `data`
    Found(JsonValue),
    Missing,
}

/// Result of one profile probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileCheck {
    Complete,
    Missing,
    /// Probe failed (network, 5xx, no credential)
    Unverified { reason: String },
}

impl ProfileCheck {
    /// Routing decision for a dashboard of `role`. Fails closed.
    pub fn decision(&self, role: Role) -> AuthorizationDecision {
        match self {
            ProfileCheck::Complete => AuthorizationDecision::Allow,
            ProfileCheck::Missing | ProfileCheck::Unverified { .. } => {
                AuthorizationDecision::RedirectToRegistration(role)
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ProfileCheck::Complete)
    }
}

impl From<&ProfileStatus> for ProfileCheck {
    fn from(status: &ProfileStatus) -> Self {
        match status {
            ProfileStatus::Found(_) => ProfileCheck::Complete,
            ProfileStatus::Missing => ProfileCheck::Missing,
        }
    }
}
