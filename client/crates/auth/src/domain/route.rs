//! Route Authorization
//!
//! Pure decision from (session view, route rule, target path) to an
//! authorization outcome. Effects (redirecting, rendering) belong to the
//! navigator.

use derive_more::Display;

use crate::domain::value_object::Role;

pub const LOGIN_PATH: &str = "/login";
pub const ROLE_SELECTION_PATH: &str = "/role-selection";
pub const GOOGLE_CALLBACK_PATH: &str = "/google-callback";

/// Where a redirect sends the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Destination {
    #[display("/login")]
    Login,
    #[display("/role-selection")]
    RoleSelection,
    /// Role dashboard, `/{role}`
    #[display("/{_0}")]
    Dashboard(Role),
    /// Role profile registration, `/{role}/register`
    #[display("/{_0}/register")]
    Registration(Role),
}

impl Destination {
    /// Landing page after sign-in: role selection until a role is chosen.
    pub fn after_login(role: Option<Role>) -> Self {
        match role {
            Some(role) => Destination::Dashboard(role),
            None => Destination::RoleSelection,
        }
    }

    pub fn path(&self) -> String {
        self.to_string()
    }
}

/// Who may open a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    SignedIn,
    Role(Role),
}

/// Authorization rule attached to one route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRule {
    pub access: Access,
    /// Require the role's profile to exist before rendering
    pub profile_gate: bool,
    /// Send a signed-in user with a role to their dashboard instead
    pub bounce_signed_in: bool,
}

impl RouteRule {
    pub const fn public() -> Self {
        Self {
            access: Access::Public,
            profile_gate: false,
            bounce_signed_in: false,
        }
    }

    pub const fn signed_in() -> Self {
        Self {
            access: Access::SignedIn,
            profile_gate: false,
            bounce_signed_in: false,
        }
    }

    pub const fn role(role: Role) -> Self {
        Self {
            access: Access::Role(role),
            profile_gate: false,
            bounce_signed_in: false,
        }
    }

    pub const fn with_profile_gate(mut self) -> Self {
        self.profile_gate = true;
        self
    }

    pub const fn bouncing_signed_in(mut self) -> Self {
        self.bounce_signed_in = true;
        self
    }
}

/// What guards see of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionView {
    pub loading: bool,
    pub authenticated: bool,
    pub role: Option<Role>,
}

/// Outcome of one navigation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    /// Session still hydrating, or a profile probe in flight
    Pending,
    Allow,
    RedirectToLogin { from: String },
    RedirectToRoleSelection { from: String },
    RedirectToDashboard(Role),
    RedirectToRegistration(Role),
}

impl AuthorizationDecision {
    /// Redirect target, if this decision is a redirect
    pub fn destination(&self) -> Option<Destination> {
        match self {
            AuthorizationDecision::Pending | AuthorizationDecision::Allow => None,
            AuthorizationDecision::RedirectToLogin { .. } => Some(Destination::Login),
            AuthorizationDecision::RedirectToRoleSelection { .. } => {
                Some(Destination::RoleSelection)
            }
            AuthorizationDecision::RedirectToDashboard(role) => Some(Destination::Dashboard(*role)),
            AuthorizationDecision::RedirectToRegistration(role) => {
                Some(Destination::Registration(*role))
            }
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, AuthorizationDecision::Allow)
    }
}

/// Decide whether `target` may render for `session` under `rule`.
pub fn decide(session: &SessionView, rule: &RouteRule, target: &str) -> AuthorizationDecision {
    if session.loading {
        return AuthorizationDecision::Pending;
    }

    let role_required = match rule.access {
        Access::Public => {
            return match (rule.bounce_signed_in, session.authenticated, session.role) {
                (true, true, Some(role)) => AuthorizationDecision::RedirectToDashboard(role),
                _ => AuthorizationDecision::Allow,
            };
        }
        Access::SignedIn => None,
        Access::Role(role) => Some(role),
    };

    if !session.authenticated {
        return AuthorizationDecision::RedirectToLogin {
            from: target.to_string(),
        };
    }

    let Some(required) = role_required else {
        return AuthorizationDecision::Allow;
    };

    match session.role {
        None if target != ROLE_SELECTION_PATH => AuthorizationDecision::RedirectToRoleSelection {
            from: target.to_string(),
        },
        None => AuthorizationDecision::Allow,
        Some(actual) if actual != required => AuthorizationDecision::RedirectToDashboard(actual),
        Some(_) => AuthorizationDecision::Allow,
    }
}
