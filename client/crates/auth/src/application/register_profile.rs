//! Register Profile Use Case
//!
//! Creates the role profile a dashboard needs before it renders.

use std::sync::Arc;

use crate::application::session_manager::AuthSessionManager;
use crate::domain::entity::Registration;
use crate::domain::repository::{AccountApi, SessionStore};
use crate::domain::route::Destination;
use crate::error::{AuthError, AuthResult};

/// Register profile use case
pub struct RegisterProfileUseCase<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    sessions: Arc<AuthSessionManager<S, A>>,
    api: Arc<A>,
}

impl<S, A> RegisterProfileUseCase<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    pub fn new(sessions: Arc<AuthSessionManager<S, A>>, api: Arc<A>) -> Self {
        Self { sessions, api }
    }

    /// Submit `registration`; on success the role dashboard is next.
    pub async fn execute(&self, registration: &Registration) -> AuthResult<Destination> {
        let target = registration.role();
        let status = self.sessions.auth_status().await;
        if !status.is_authenticated {
            return Err(AuthError::NotAuthenticated);
        }
        match status.role {
            Some(actual) if actual != target => {
                return Err(AuthError::RoleMismatch {
                    expected: target,
                    actual,
                })
            }
            Some(_) => {}
            None => return Err(AuthError::RoleNotSelected),
        }

        let credential = self.sessions.credential().await?;
        self.api
            .register_profile(&credential, registration)
            .await
            .inspect_err(|e| e.log())?;

        tracing::info!(role = %target, "Profile registered");
        Ok(Destination::Dashboard(target))
    }
}
