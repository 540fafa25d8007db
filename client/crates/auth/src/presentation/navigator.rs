//! Navigator
//!
//! Turns a requested path into the screen to show. Each navigation takes a
//! generation ticket; a result that arrives after a newer navigation has
//! started is dropped instead of overwriting the newer screen.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

use crate::application::config::AuthConfig;
use crate::application::route_guard::RouteGuard;
use crate::application::session_manager::AuthSessionManager;
use crate::domain::repository::{AccountApi, SessionStore};
use crate::domain::route::{AuthorizationDecision, Destination};
use crate::error::{AuthError, AuthResult};
use crate::presentation::router::{normalize, Resolved, RouteTable, View};

/// What the user sees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Session hydrating or profile probe in flight
    Loading,
    View(View),
    Redirect {
        to: Destination,
        /// Path the user asked for, kept so login can return there
        from: Option<String>,
    },
}

impl Screen {
    fn from_decision(decision: AuthorizationDecision, view: View) -> Self {
        match decision {
            AuthorizationDecision::Pending => Screen::Loading,
            AuthorizationDecision::Allow => Screen::View(view),
            AuthorizationDecision::RedirectToLogin { from } => Screen::Redirect {
                to: Destination::Login,
                from: Some(from),
            },
            AuthorizationDecision::RedirectToRoleSelection { from } => Screen::Redirect {
                to: Destination::RoleSelection,
                from: Some(from),
            },
            AuthorizationDecision::RedirectToDashboard(role) => Screen::Redirect {
                to: Destination::Dashboard(role),
                from: None,
            },
            AuthorizationDecision::RedirectToRegistration(role) => Screen::Redirect {
                to: Destination::Registration(role),
                from: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Shown(Screen),
    /// A newer navigation started first
    Superseded,
}

/// Navigator
pub struct Navigator<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    table: RouteTable,
    guard: RouteGuard<S, A>,
    sessions: Arc<AuthSessionManager<S, A>>,
    generation: AtomicU64,
    screen: watch::Sender<Screen>,
    max_redirects: usize,
}

impl<S, A> Navigator<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    pub fn new(sessions: Arc<AuthSessionManager<S, A>>, api: Arc<A>, config: &AuthConfig) -> Self {
        let (screen, _) = watch::channel(Screen::Loading);
        Self {
            table: RouteTable::new(),
            guard: RouteGuard::new(Arc::clone(&sessions), api),
            sessions,
            generation: AtomicU64::new(0),
            screen,
            max_redirects: config.max_redirects,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Screen> {
        self.screen.subscribe()
    }

    /// Screen of the newest navigation that has produced one
    pub fn current(&self) -> Screen {
        self.screen.borrow().clone()
    }

    pub fn guard(&self) -> &RouteGuard<S, A> {
        &self.guard
    }

    /// Resolve one navigation without following redirects
    pub async fn open(&self, path: &str) -> NavigationOutcome {
        let ticket = self.generation.fetch_add(1, Ordering::AcqRel) + 1;

        let route = match self.table.resolve(path) {
            Resolved::Route(route) => route,
            Resolved::Redirect(to) => return self.publish(ticket, Screen::Redirect { to, from: None }),
        };

        let target = normalize(path);
        let decision = self.guard.precheck(target, &route.rule).await;
        let decision = match self.guard.gated_role(&decision, &route.rule) {
            Some(role) => {
                // the dashboard is not rendered until the probe answers
                if self.publish(ticket, Screen::Loading) == NavigationOutcome::Superseded {
                    return NavigationOutcome::Superseded;
                }
                self.guard.profile_gate(role).await
            }
            None => decision,
        };

        self.publish(ticket, Screen::from_decision(decision, route.view))
    }

    /// Open `path` once the session is ready and follow redirects until a
    /// view or loading screen is reached.
    pub async fn settle(&self, path: &str) -> AuthResult<NavigationOutcome> {
        self.sessions.wait_ready().await;

        let mut path = path.to_string();
        for _ in 0..=self.max_redirects {
            match self.open(&path).await {
                NavigationOutcome::Shown(Screen::Redirect { to, .. }) => {
                    tracing::debug!(from = %path, to = %to, "Following redirect");
                    path = to.path();
                }
                outcome => return Ok(outcome),
            }
        }

        tracing::warn!(path = %path, "Redirects did not settle");
        Err(AuthError::RedirectLoop)
    }

    fn publish(&self, ticket: u64, screen: Screen) -> NavigationOutcome {
        let shown = self.screen.send_if_modified(|current| {
            if self.generation.load(Ordering::Acquire) != ticket {
                return false;
            }
            *current = screen.clone();
            true
        });

        if shown {
            NavigationOutcome::Shown(screen)
        } else {
            tracing::debug!(ticket, "Navigation superseded");
            NavigationOutcome::Superseded
        }
    }
}
