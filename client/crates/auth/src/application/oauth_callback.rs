//! Google OAuth Callback Use Case
//!
//! The backend finishes Google sign-in by redirecting to
//! `/google-callback?token=...`. This reads the token and signs in with it.

use std::sync::Arc;

use platform::client::Url;

use crate::application::session_manager::{AuthSessionManager, LoginOutcome};
use crate::domain::repository::{AccountApi, SessionStore};
use crate::domain::route::{Destination, GOOGLE_CALLBACK_PATH};
use crate::error::AuthError;

/// Callback result. Every failure lands on the login page.
#[derive(Debug)]
pub enum CallbackOutcome {
    SignedIn(LoginOutcome),
    Failed(AuthError),
}

impl CallbackOutcome {
    pub fn redirect(&self) -> Destination {
        match self {
            CallbackOutcome::SignedIn(outcome) => outcome.redirect,
            CallbackOutcome::Failed(_) => Destination::Login,
        }
    }
}

/// Google callback use case
pub struct GoogleCallbackUseCase<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    sessions: Arc<AuthSessionManager<S, A>>,
}

impl<S, A> GoogleCallbackUseCase<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    pub fn new(sessions: Arc<AuthSessionManager<S, A>>) -> Self {
        Self { sessions }
    }

    /// `callback` is the full callback URL, a path with query, or just the
    /// query string.
    pub async fn execute(&self, callback: &str) -> CallbackOutcome {
        let Some(token) = token_param(callback) else {
            tracing::warn!("OAuth callback without a token");
            return CallbackOutcome::Failed(AuthError::InvalidCredential);
        };

        match self.sessions.login(&token).await {
            Ok(outcome) => CallbackOutcome::SignedIn(outcome),
            Err(e) => {
                tracing::warn!(error = %e, "OAuth callback sign-in failed");
                CallbackOutcome::Failed(e)
            }
        }
    }
}

/// Non-empty `token` query parameter of a callback address
pub fn token_param(callback: &str) -> Option<String> {
    let base = Url::parse("http://localhost").ok()?.join(GOOGLE_CALLBACK_PATH).ok()?;
    let url = base.join(callback.trim()).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.trim().is_empty())
}
