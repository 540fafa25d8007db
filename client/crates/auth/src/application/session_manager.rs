//! Auth Session Manager
//!
//! Owns the signed-in session: hydrates it from the store, replaces it on
//! login and role change, and drops it on logout. State is published on a
//! watch channel so guards and views can follow it.
//!
//! Every mutation and status read takes `lock`. Network calls run before the
//! lock is taken, so the store and the published state only ever change
//! together.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::domain::entity::{Claims, SessionRecord, StoredSession};
use crate::domain::repository::{AccountApi, SessionStore};
use crate::domain::route::{Destination, SessionView};
use crate::domain::token::{self, DecodeError};
use crate::domain::value_object::{Credential, Role};
use crate::error::{AuthError, AuthResult};

/// Published session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub record: Option<SessionRecord>,
    /// `true` until the first hydration finishes
    pub loading: bool,
}

/// Result of [`AuthSessionManager::auth_status`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub has_role: bool,
    pub role: Option<Role>,
}

/// Successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub record: SessionRecord,
    pub redirect: Destination,
}

/// Successful role change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOutcome {
    pub record: SessionRecord,
    pub redirect: Destination,
}

/// Flips `loading` off however hydration exits. If hydration did not run to
/// completion (the future was dropped), `initialize` is re-armed so the next
/// call hydrates again.
struct ReadyOnDrop<'a> {
    state: &'a watch::Sender<SessionState>,
    initialized: &'a AtomicBool,
    finished: bool,
}

impl Drop for ReadyOnDrop<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.initialized.store(false, Ordering::Release);
        }
        self.state.send_if_modified(|state| std::mem::replace(&mut state.loading, false));
    }
}

/// Reject a credential that cannot be treated as live
fn ensure_live(claims: &Claims, now_ms: i64) -> AuthResult<()> {
    if claims.expires_at_ms.is_none() {
        return Err(DecodeError::MissingClaim("exp").into());
    }
    if claims.is_expired_at(now_ms) {
        return Err(AuthError::Expired);
    }
    Ok(())
}

/// Auth session manager
pub struct AuthSessionManager<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    store: Arc<S>,
    api: Arc<A>,
    state: watch::Sender<SessionState>,
    lock: Mutex<()>,
    initialized: AtomicBool,
}

impl<S, A> AuthSessionManager<S, A>
where
    S: SessionStore + Send + Sync + 'static,
    A: AccountApi + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, api: Arc<A>) -> Self {
        let (state, _) = watch::channel(SessionState {
            record: None,
            loading: true,
        });
        Self {
            store,
            api,
            state,
            lock: Mutex::new(()),
            initialized: AtomicBool::new(false),
        }
    }

    /// Follow state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current state
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Wait until hydration has finished
    pub async fn wait_ready(&self) -> SessionState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            // the sender lives in `self`, so the channel cannot close here
            Err(_) => self.snapshot(),
        }
    }

    /// Hydrate from the store. Runs once; later calls return immediately.
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::AcqRel) {
            return;
        }

        let mut ready = ReadyOnDrop {
            state: &self.state,
            initialized: &self.initialized,
            finished: false,
        };
        let _guard = self.lock.lock().await;

        let record = match self.hydrate().await {
            Ok(record) => record,
            Err(e) => {
                e.log();
                if let Err(e) = self.store.clear().await {
                    e.log();
                }
                None
            }
        };

        match &record {
            Some(record) => {
                tracing::info!(user_id = %record.id, role = ?record.role, "Session restored")
            }
            None => tracing::debug!("No session to restore"),
        }
        self.state.send_modify(|state| state.record = record);
        ready.finished = true;
    }

    async fn hydrate(&self) -> AuthResult<Option<SessionRecord>> {
        let Some(stored) = self.store.load().await? else {
            return Ok(None);
        };

        let claims = token::decode(stored.credential.as_str())?;
        ensure_live(&claims, token::now_ms())?;

        let record = match stored.record {
            Some(record) if record.id == claims.id => record,
            cached => {
                if let Some(other) = cached {
                    tracing::warn!(
                        user_id = %claims.id,
                        cached_id = %other.id,
                        "Cached user does not match credential, rebuilding it"
                    );
                }
                let record = SessionRecord::from(&claims);
                self.store
                    .save(&StoredSession::new(stored.credential, record.clone()))
                    .await?;
                record
            }
        };
        Ok(Some(record))
    }

    /// Adopt a freshly issued credential
    pub async fn login(&self, raw: &str) -> AuthResult<LoginOutcome> {
        let credential = Credential::parse(raw)?;
        let claims = token::decode(credential.as_str())?;
        ensure_live(&claims, token::now_ms())?;

        let record = SessionRecord::from(&claims);
        let redirect = Destination::after_login(record.role);

        let _guard = self.lock.lock().await;
        self.store
            .save(&StoredSession::new(credential, record.clone()))
            .await?;
        self.state
            .send_modify(|state| state.record = Some(record.clone()));

        tracing::info!(user_id = %record.id, role = ?record.role, "User signed in");
        Ok(LoginOutcome { record, redirect })
    }

    /// Drop the session. Never fails.
    ///
    /// Returns the backend sign-out notification task, if one was started,
    /// so short-lived callers can wait for it.
    pub async fn logout(&self) -> Option<JoinHandle<()>> {
        let _guard = self.lock.lock().await;

        let credential = match self.store.load().await {
            Ok(stored) => stored.map(|s| s.credential),
            Err(e) => {
                e.log();
                None
            }
        };
        if let Err(e) = self.store.clear().await {
            e.log();
        }

        let user_id = self.state.borrow().record.as_ref().map(|r| r.id.clone());
        self.state.send_modify(|state| state.record = None);
        match user_id {
            Some(user_id) => tracing::info!(user_id = %user_id, "User signed out"),
            None => tracing::debug!("Sign out without a session"),
        }

        let credential = credential?;
        let api = Arc::clone(&self.api);
        Some(tokio::spawn(async move {
            if let Err(e) = api.sign_out(&credential).await {
                tracing::debug!(error = %e, "Backend sign-out notification failed");
            }
        }))
    }

    /// Set the account role and switch to the credential the backend issues
    pub async fn update_role(&self, role: Role) -> AuthResult<RoleOutcome> {
        let credential = self.credential().await?;

        let grant = self
            .api
            .update_role(&credential, role)
            .await
            .inspect_err(|e| e.log())?;

        token::decode(grant.credential.as_str())?;
        match grant.record.role {
            Some(actual) if actual == role => {}
            Some(actual) => {
                return Err(AuthError::RoleMismatch {
                    expected: role,
                    actual,
                })
            }
            None => {
                return Err(AuthError::Internal(
                    "role update returned a user without a role".to_string(),
                ))
            }
        }

        let _guard = self.lock.lock().await;
        // a logout or another login while the request was out wins
        let unchanged = self
            .store
            .load()
            .await?
            .is_some_and(|stored| stored.credential == credential);
        if !unchanged {
            return Err(AuthError::NotAuthenticated);
        }

        let record = grant.record.clone();
        self.store
            .save(&StoredSession::new(grant.credential, grant.record))
            .await?;
        self.state
            .send_modify(|state| state.record = Some(record.clone()));

        tracing::info!(user_id = %record.id, role = %role, "Role updated");
        Ok(RoleOutcome {
            record,
            redirect: Destination::Registration(role),
        })
    }

    /// Re-derive authentication from the store against the wall clock
    pub async fn auth_status(&self) -> AuthStatus {
        self.auth_status_at(token::now_ms()).await
    }

    /// [`Self::auth_status`] against a fixed instant
    pub async fn auth_status_at(&self, now_ms: i64) -> AuthStatus {
        let _guard = self.lock.lock().await;

        let (has_record, role) = {
            let state = self.state.borrow();
            (
                state.record.is_some(),
                state.record.as_ref().and_then(|r| r.role),
            )
        };
        let credential_live = match self.store.load().await {
            Ok(Some(stored)) => token::is_valid_at(stored.credential.as_str(), now_ms),
            Ok(None) => false,
            Err(e) => {
                e.log();
                false
            }
        };

        AuthStatus {
            is_authenticated: has_record && credential_live,
            has_role: role.is_some(),
            role,
        }
    }

    /// What route guards see
    pub async fn session_view(&self) -> SessionView {
        if self.state.borrow().loading {
            return SessionView {
                loading: true,
                ..SessionView::default()
            };
        }
        let status = self.auth_status().await;
        SessionView {
            loading: false,
            authenticated: status.is_authenticated,
            role: status.role,
        }
    }

    /// The stored credential, if it is still live
    pub async fn credential(&self) -> AuthResult<Credential> {
        let _guard = self.lock.lock().await;
        let stored = self
            .store
            .load()
            .await?
            .ok_or(AuthError::NotAuthenticated)?;
        if !token::is_valid(stored.credential.as_str()) {
            return Err(AuthError::Expired);
        }
        Ok(stored.credential)
    }
}
