//! Profile-Completeness Guard
//!
//! Probes `api/{role}/profile` before a role dashboard renders.

use std::sync::Arc;

use crate::application::session_manager::AuthSessionManager;
use crate::domain::profile::{ProfileCheck, ProfileStatus};
use crate::domain::repository::{AccountApi, SessionStore};
use crate::domain::value_object::Role;
use crate::error::AuthResult;

/// Profile guard
pub struct ProfileGuard<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    sessions: Arc<AuthSessionManager<S, A>>,
    api: Arc<A>,
}

impl<S, A> ProfileGuard<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    pub fn new(sessions: Arc<AuthSessionManager<S, A>>, api: Arc<A>) -> Self {
        Self { sessions, api }
    }

    /// One probe. Failures come back as `Unverified`, never as an error.
    pub async fn check(&self, role: Role) -> ProfileCheck {
        match self.fetch(role).await {
            Ok(status) => {
                let check = ProfileCheck::from(&status);
                tracing::debug!(role = %role, complete = check.is_complete(), "Profile probed");
                check
            }
            Err(e) => {
                tracing::warn!(role = %role, error = %e, "Profile could not be verified");
                ProfileCheck::Unverified {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Fetch the profile document for a dashboard to render
    pub async fn fetch(&self, role: Role) -> AuthResult<ProfileStatus> {
        let credential = self.sessions.credential().await?;
        self.api.fetch_profile(&credential, role).await
    }
}
