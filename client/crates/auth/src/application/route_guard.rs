//! Route Authorization Guard
//!
//! Applies the pure route decision to the live session, then the profile
//! gate for routes that carry one.

use std::sync::Arc;

use crate::application::profile_guard::ProfileGuard;
use crate::application::session_manager::AuthSessionManager;
use crate::domain::repository::{AccountApi, SessionStore};
use crate::domain::route::{self, AuthorizationDecision, RouteRule};
use crate::domain::value_object::Role;

/// Route guard
pub struct RouteGuard<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    sessions: Arc<AuthSessionManager<S, A>>,
    profiles: ProfileGuard<S, A>,
}

impl<S, A> RouteGuard<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    pub fn new(sessions: Arc<AuthSessionManager<S, A>>, api: Arc<A>) -> Self {
        Self {
            profiles: ProfileGuard::new(Arc::clone(&sessions), api),
            sessions,
        }
    }

    /// Session checks only
    pub async fn precheck(&self, path: &str, rule: &RouteRule) -> AuthorizationDecision {
        let view = self.sessions.session_view().await;
        let decision = route::decide(&view, rule, path);
        tracing::debug!(path = %path, decision = ?decision, "Route decision");
        decision
    }

    /// Role whose profile must be probed before `decision` may render
    pub fn gated_role(&self, decision: &AuthorizationDecision, rule: &RouteRule) -> Option<Role> {
        match (decision, rule.access) {
            (AuthorizationDecision::Allow, route::Access::Role(role)) if rule.profile_gate => {
                Some(role)
            }
            _ => None,
        }
    }

    /// Profile gate for `role`
    pub async fn profile_gate(&self, role: Role) -> AuthorizationDecision {
        self.profiles.check(role).await.decision(role)
    }

    /// Full check: session rules, then the profile gate
    pub async fn authorize(&self, path: &str, rule: &RouteRule) -> AuthorizationDecision {
        let decision = self.precheck(path, rule).await;
        match self.gated_role(&decision, rule) {
            Some(role) => self.profile_gate(role).await,
            None => decision,
        }
    }

    pub fn profiles(&self) -> &ProfileGuard<S, A> {
        &self.profiles
    }
}
