//! Scenario tests for the auth crate
//! Session lifecycle, guards and navigation over in-memory fakes.

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use kernel::error::kind::ErrorKind;
    use platform::storage::MemoryKeyValueStore;
    use serde_json::json;
    use tokio::sync::Notify;

    use crate::application::config::AuthConfig;
    use crate::application::session_manager::AuthSessionManager;
    use crate::domain::entity::{Registration, RoleGrant, SessionRecord};
    use crate::domain::profile::ProfileStatus;
    use crate::domain::repository::AccountApi;
    use crate::domain::token::{encode_for_test, now_ms};
    use crate::domain::value_object::{Credential, Role};
    use crate::error::{AuthError, AuthResult};
    use crate::infra::storage::KvSessionStore;

    pub type Store = KvSessionStore<MemoryKeyValueStore>;
    pub type Manager = AuthSessionManager<Store, FakeApi>;

    /// Credential valid for an hour
    pub fn live_token(id: &str, role: Option<Role>) -> String {
        encode_for_test(&json!({
            "id": id,
            "email": format!("{id}@example.com"),
            "role": role.map(|r| r.code()),
            "name": "Test User",
            "exp": now_ms() / 1000 + 3600,
        }))
    }

    pub fn expired_token(id: &str) -> String {
        encode_for_test(&json!({ "id": id, "role": "patient", "exp": now_ms() / 1000 - 60 }))
    }

    #[derive(Debug, Clone, Copy)]
    pub enum ProfileReply {
        Found,
        Missing,
        ServerError,
    }

    #[derive(Debug, Clone)]
    pub enum RoleReply {
        Grant,
        Reject(&'static str),
        Down,
    }

    /// Scriptable backend
    pub struct FakeApi {
        pub role_reply: Mutex<RoleReply>,
        pub profile_reply: Mutex<ProfileReply>,
        pub register_reply: Mutex<Option<&'static str>>,
        pub probe_gate: Mutex<Option<Arc<Notify>>>,
        pub registered: Mutex<Vec<Registration>>,
        pub role_calls: AtomicUsize,
        pub profile_calls: AtomicUsize,
        pub sign_outs: AtomicUsize,
    }

    impl Default for FakeApi {
        fn default() -> Self {
            Self {
                role_reply: Mutex::new(RoleReply::Grant),
                profile_reply: Mutex::new(ProfileReply::Found),
                register_reply: Mutex::new(None),
                probe_gate: Mutex::new(None),
                registered: Mutex::new(Vec::new()),
                role_calls: AtomicUsize::new(0),
                profile_calls: AtomicUsize::new(0),
                sign_outs: AtomicUsize::new(0),
            }
        }
    }

    impl FakeApi {
        pub fn profile(&self, reply: ProfileReply) {
            *self.profile_reply.lock().unwrap() = reply;
        }

        pub fn role(&self, reply: RoleReply) {
            *self.role_reply.lock().unwrap() = reply;
        }
    }

    impl AccountApi for FakeApi {
        async fn update_role(&self, credential: &Credential, role: Role) -> AuthResult<RoleGrant> {
            self.role_calls.fetch_add(1, Ordering::SeqCst);
            let reply = self.role_reply.lock().unwrap().clone();
            match reply {
                RoleReply::Grant => {
                    let claims = crate::domain::token::decode(credential.as_str())?;
                    let token = live_token(claims.id.as_str(), Some(role));
                    let mut record = SessionRecord::from(&claims);
                    record.role = Some(role);
                    Ok(RoleGrant {
                        credential: Credential::parse(token)?,
                        record,
                    })
                }
                RoleReply::Reject(message) => Err(AuthError::Rejected {
                    kind: ErrorKind::BadRequest,
                    message: Some(message.to_string()),
                }),
                RoleReply::Down => Err(AuthError::Network("connection refused".into())),
            }
        }

        async fn fetch_profile(
            &self,
            _credential: &Credential,
            _role: Role,
        ) -> AuthResult<ProfileStatus> {
            self.profile_calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.probe_gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            let reply = *self.profile_reply.lock().unwrap();
            match reply {
                ProfileReply::Found => Ok(ProfileStatus::Found(json!({ "fullName": "Test" }))),
                ProfileReply::Missing => Ok(ProfileStatus::Missing),
                ProfileReply::ServerError => Err(AuthError::Rejected {
                    kind: ErrorKind::InternalServerError,
                    message: None,
                }),
            }
        }

        async fn register_profile(
            &self,
            _credential: &Credential,
            registration: &Registration,
        ) -> AuthResult<()> {
            let reply = *self.register_reply.lock().unwrap();
            if let Some(message) = reply {
                return Err(AuthError::Rejected {
                    kind: ErrorKind::BadRequest,
                    message: Some(message.to_string()),
                });
            }
            self.registered.lock().unwrap().push(registration.clone());
            Ok(())
        }

        async fn sign_out(&self, _credential: &Credential) -> AuthResult<()> {
            self.sign_outs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    pub struct Harness {
        pub store: Arc<Store>,
        pub api: Arc<FakeApi>,
        pub manager: Arc<Manager>,
        pub config: AuthConfig,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_config(AuthConfig::default())
        }

        pub fn with_config(config: AuthConfig) -> Self {
            let store = Arc::new(KvSessionStore::new(MemoryKeyValueStore::new(), &config));
            let api = Arc::new(FakeApi::default());
            let manager = Arc::new(AuthSessionManager::new(
                Arc::clone(&store),
                Arc::clone(&api),
            ));
            Self {
                store,
                api,
                manager,
                config,
            }
        }

        /// Initialized manager signed in with `role`
        pub async fn signed_in(role: Option<Role>) -> Self {
            let harness = Self::new();
            harness.manager.initialize().await;
            harness
                .manager
                .login(&live_token("u1", role))
                .await
                .unwrap();
            harness
        }
    }
}

#[cfg(test)]
mod session_manager_tests {
    use std::sync::atomic::Ordering;

    use platform::storage::{KeyValueStore, StorageError, Write};

    use super::fakes::*;
    use crate::domain::entity::{SessionRecord, StoredSession};
    use crate::domain::repository::SessionStore;
    use crate::domain::route::Destination;
    use crate::domain::token::{self, decode, DecodeError};
    use crate::domain::value_object::{Credential, Role};
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_starts_loading_until_initialized() {
        let h = Harness::new();
        assert!(h.manager.snapshot().loading);

        h.manager.initialize().await;
        let state = h.manager.snapshot();
        assert!(!state.loading);
        assert_eq!(state.record, None);
    }

    #[tokio::test]
    async fn test_initialize_twice_is_noop() {
        let h = Harness::new();
        h.manager.initialize().await;
        h.manager.login(&live_token("u1", None)).await.unwrap();

        // a second hydration must not reset the signed-in state
        h.manager.initialize().await;
        assert!(h.manager.snapshot().record.is_some());
    }

    #[tokio::test]
    async fn test_hydrate_expired_credential() {
        let h = Harness::new();
        let token = expired_token("u1");
        assert!(!token::is_valid(&token));

        let claims = decode(&token).unwrap();
        h.store
            .save(&StoredSession::new(
                Credential::parse(token).unwrap(),
                (&claims).into(),
            ))
            .await
            .unwrap();

        h.manager.initialize().await;
        assert_eq!(h.manager.snapshot().record, None);
        assert!(!h.manager.auth_status().await.is_authenticated);
        assert_eq!(h.store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_hydrate_credential_without_record() {
        let h = Harness::new();
        h.store
            .inner()
            .apply(&[Write::set("token", live_token("u7", Some(Role::Doctor)))])
            .await
            .unwrap();

        h.manager.initialize().await;
        let record = h.manager.snapshot().record.unwrap();
        assert_eq!(record.id.as_str(), "u7");
        assert_eq!(record.role, Some(Role::Doctor));

        // decoded record is written back
        let stored = h.store.load().await.unwrap().unwrap();
        assert_eq!(stored.record, Some(record));
    }

    #[tokio::test]
    async fn test_hydrate_record_of_another_user() {
        let h = Harness::new();
        let other = decode(&live_token("u9", Some(Role::Doctor))).unwrap();
        h.store
            .inner()
            .apply(&[
                Write::set("token", live_token("u7", Some(Role::Patient))),
                Write::set("user", serde_json::to_string(&SessionRecord::from(&other)).unwrap()),
            ])
            .await
            .unwrap();

        h.manager.initialize().await;
        let record = h.manager.snapshot().record.unwrap();
        assert_eq!(record.id.as_str(), "u7");
        assert_eq!(record.role, Some(Role::Patient));

        // the stale record is replaced on disk too
        let stored = h.store.load().await.unwrap().unwrap();
        assert_eq!(stored.record, Some(record));
    }

    #[tokio::test]
    async fn test_hydrate_corrupt_store() {
        let h = Harness::new();
        h.store
            .inner()
            .apply(&[
                Write::set("token", live_token("u1", None)),
                Write::set("user", "{not json"),
            ])
            .await
            .unwrap();
        assert!(matches!(
            h.store.load().await,
            Err(AuthError::Storage(StorageError::Corrupt(_)))
        ));

        h.manager.initialize().await;
        let state = h.manager.snapshot();
        assert!(!state.loading);
        assert_eq!(state.record, None);
        assert_eq!(h.store.inner().get("token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_wait_ready_resolves_after_initialize() {
        let h = Harness::new();
        let manager = h.manager.clone();
        let waiter = tokio::spawn(async move { manager.wait_ready().await });

        h.manager.initialize().await;
        let state = waiter.await.unwrap();
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_login_redirect_hints() {
        let h = Harness::new();
        h.manager.initialize().await;

        let outcome = h.manager.login(&live_token("u1", None)).await.unwrap();
        assert_eq!(outcome.redirect, Destination::RoleSelection);
        assert_eq!(outcome.redirect.path(), "/role-selection");

        let outcome = h
            .manager
            .login(&live_token("u2", Some(Role::Doctor)))
            .await
            .unwrap();
        assert_eq!(outcome.redirect.path(), "/doctor");

        // same claims, same hint
        let again = h
            .manager
            .login(&live_token("u2", Some(Role::Doctor)))
            .await
            .unwrap();
        assert_eq!(again.redirect, outcome.redirect);
    }

    #[tokio::test]
    async fn test_login_persists_and_publishes() {
        let h = Harness::new();
        h.manager.initialize().await;
        let mut rx = h.manager.subscribe();

        let token = live_token("u1", Some(Role::Patient));
        let outcome = h.manager.login(&token).await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().record.as_ref(), Some(&outcome.record));

        let stored = h.store.load().await.unwrap().unwrap();
        assert_eq!(stored.credential.as_str(), token);
        assert_eq!(stored.record, Some(outcome.record));

        let status = h.manager.auth_status().await;
        assert!(status.is_authenticated);
        assert!(status.has_role);
        assert_eq!(status.role, Some(Role::Patient));
    }

    #[tokio::test]
    async fn test_login_failures_leave_state_untouched() {
        let h = Harness::new();
        h.manager.initialize().await;

        assert!(matches!(
            h.manager.login("").await,
            Err(AuthError::InvalidCredential)
        ));
        assert!(matches!(
            h.manager.login("not-a-token").await,
            Err(AuthError::Decode(_))
        ));
        let no_id = crate::domain::token::encode_for_test(&serde_json::json!({ "role": "doctor" }));
        assert!(matches!(
            h.manager.login(&no_id).await,
            Err(AuthError::Decode(_))
        ));
        assert!(matches!(
            h.manager.login(&expired_token("u1")).await,
            Err(AuthError::Expired)
        ));
        let no_exp = crate::domain::token::encode_for_test(&serde_json::json!({ "id": "u1" }));
        assert!(matches!(
            h.manager.login(&no_exp).await,
            Err(AuthError::Decode(DecodeError::MissingClaim("exp")))
        ));

        assert_eq!(h.manager.snapshot().record, None);
        assert_eq!(h.store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_always_signs_out() {
        let h = Harness::signed_in(Some(Role::Doctor)).await;

        let notification = h.manager.logout().await;
        notification.expect("sign-out notification").await.unwrap();
        assert_eq!(h.api.sign_outs.load(Ordering::SeqCst), 1);

        assert!(!h.manager.auth_status().await.is_authenticated);
        assert_eq!(h.manager.snapshot().record, None);
        assert_eq!(h.store.load().await.unwrap(), None);

        // nothing held: no notification, still fine
        assert!(h.manager.logout().await.is_none());
        assert!(!h.manager.auth_status().await.is_authenticated);
    }

    #[tokio::test]
    async fn test_logout_with_corrupt_store() {
        let h = Harness::signed_in(None).await;
        h.store
            .inner()
            .apply(&[Write::set("user", "[]")])
            .await
            .unwrap();

        assert!(h.manager.logout().await.is_none());
        assert_eq!(h.manager.snapshot().record, None);
        assert_eq!(h.store.inner().get("user").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_role_replaces_credential_and_record() {
        let h = Harness::signed_in(None).await;
        let before = h.store.load().await.unwrap().unwrap();

        let outcome = h.manager.update_role(Role::Patient).await.unwrap();
        assert_eq!(outcome.redirect, Destination::Registration(Role::Patient));
        assert_eq!(outcome.record.role, Some(Role::Patient));

        let after = h.store.load().await.unwrap().unwrap();
        assert_ne!(after.credential, before.credential);
        assert_eq!(decode(after.credential.as_str()).unwrap().role, Some(Role::Patient));
        assert_eq!(after.record.as_ref(), Some(&outcome.record));
        assert_eq!(h.manager.snapshot().record, Some(outcome.record));
    }

    #[tokio::test]
    async fn test_update_role_failure_changes_nothing() {
        let h = Harness::signed_in(None).await;
        let before = h.store.load().await.unwrap();

        h.api.role(RoleReply::Reject("Role already set"));
        let err = h.manager.update_role(Role::Doctor).await.unwrap_err();
        assert_eq!(err.user_message(), "Role already set");

        h.api.role(RoleReply::Down);
        let err = h.manager.update_role(Role::Doctor).await.unwrap_err();
        assert!(matches!(err, AuthError::Network(_)));

        assert_eq!(h.store.load().await.unwrap(), before);
        assert_eq!(h.manager.snapshot().record.unwrap().role, None);
    }

    #[tokio::test]
    async fn test_update_role_requires_session() {
        let h = Harness::new();
        h.manager.initialize().await;
        assert!(matches!(
            h.manager.update_role(Role::Doctor).await,
            Err(AuthError::NotAuthenticated)
        ));
        assert_eq!(h.api.role_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_auth_status_rechecks_expiry() {
        let h = Harness::signed_in(Some(Role::Doctor)).await;
        assert!(h.manager.auth_status().await.is_authenticated);

        let in_two_hours = token::now_ms() + 2 * 3600 * 1000;
        let later = h.manager.auth_status_at(in_two_hours).await;
        assert!(!later.is_authenticated);
        assert_eq!(later.role, Some(Role::Doctor));
    }

    #[tokio::test]
    async fn test_auth_status_sees_external_clear() {
        let h = Harness::signed_in(Some(Role::Patient)).await;
        // another process signed out through the shared store
        h.store.clear().await.unwrap();
        assert!(!h.manager.auth_status().await.is_authenticated);
    }

    #[tokio::test]
    async fn test_credential_accessor() {
        let h = Harness::signed_in(None).await;
        assert!(h.manager.credential().await.is_ok());

        h.manager.logout().await;
        assert!(matches!(
            h.manager.credential().await,
            Err(AuthError::NotAuthenticated)
        ));
    }
}

#[cfg(test)]
mod guard_tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::fakes::*;
    use crate::application::profile_guard::ProfileGuard;
    use crate::application::route_guard::RouteGuard;
    use crate::domain::profile::{ProfileCheck, ProfileStatus};
    use crate::domain::route::{AuthorizationDecision, RouteRule, ROLE_SELECTION_PATH};
    use crate::domain::value_object::Role;

    fn route_guard(h: &Harness) -> RouteGuard<Store, FakeApi> {
        RouteGuard::new(Arc::clone(&h.manager), Arc::clone(&h.api))
    }

    #[tokio::test]
    async fn test_pending_while_loading() {
        let h = Harness::new();
        let decision = route_guard(&h)
            .authorize("/doctor", &RouteRule::role(Role::Doctor))
            .await;
        assert_eq!(decision, AuthorizationDecision::Pending);
    }

    #[tokio::test]
    async fn test_doctor_on_patient_route() {
        let h = Harness::signed_in(Some(Role::Doctor)).await;
        let decision = route_guard(&h)
            .authorize("/patient", &RouteRule::role(Role::Patient).with_profile_gate())
            .await;
        assert_eq!(decision, AuthorizationDecision::RedirectToDashboard(Role::Doctor));
        assert_eq!(h.api.profile_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_role_and_role_selection() {
        let h = Harness::signed_in(None).await;
        let guard = route_guard(&h);
        assert_eq!(
            guard
                .authorize("/doctor/register", &RouteRule::role(Role::Doctor))
                .await,
            AuthorizationDecision::RedirectToRoleSelection {
                from: "/doctor/register".into()
            }
        );
        assert!(guard
            .authorize(ROLE_SELECTION_PATH, &RouteRule::signed_in())
            .await
            .is_allow());
    }

    #[tokio::test]
    async fn test_profile_gate_outcomes() {
        let h = Harness::signed_in(Some(Role::Patient)).await;
        let guard = route_guard(&h);
        let rule = RouteRule::role(Role::Patient).with_profile_gate();

        assert!(guard.authorize("/patient", &rule).await.is_allow());

        h.api.profile(ProfileReply::Missing);
        assert_eq!(
            guard.authorize("/patient", &rule).await,
            AuthorizationDecision::RedirectToRegistration(Role::Patient)
        );

        h.api.profile(ProfileReply::ServerError);
        assert_eq!(
            guard.authorize("/patient", &rule).await,
            AuthorizationDecision::RedirectToRegistration(Role::Patient)
        );
        assert_eq!(h.api.profile_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_profile_check_distinguishes_outage() {
        let h = Harness::signed_in(Some(Role::Doctor)).await;
        let profiles = ProfileGuard::new(Arc::clone(&h.manager), Arc::clone(&h.api));

        assert_eq!(profiles.check(Role::Doctor).await, ProfileCheck::Complete);
        assert!(matches!(
            profiles.fetch(Role::Doctor).await,
            Ok(ProfileStatus::Found(_))
        ));

        h.api.profile(ProfileReply::Missing);
        assert_eq!(profiles.check(Role::Doctor).await, ProfileCheck::Missing);

        h.api.profile(ProfileReply::ServerError);
        assert!(matches!(
            profiles.check(Role::Doctor).await,
            ProfileCheck::Unverified { .. }
        ));
    }

    #[tokio::test]
    async fn test_profile_check_without_session_is_unverified() {
        let h = Harness::new();
        h.manager.initialize().await;
        let profiles = ProfileGuard::new(Arc::clone(&h.manager), Arc::clone(&h.api));
        assert!(matches!(
            profiles.check(Role::Doctor).await,
            ProfileCheck::Unverified { .. }
        ));
        assert_eq!(h.api.profile_calls.load(Ordering::SeqCst), 0);
    }
}

#[cfg(test)]
mod navigator_tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::Notify;

    use super::fakes::*;
    use crate::application::config::AuthConfig;
    use crate::domain::route::Destination;
    use crate::domain::value_object::Role;
    use crate::error::AuthError;
    use crate::presentation::navigator::{NavigationOutcome, Navigator, Screen};
    use crate::presentation::router::View;

    fn navigator(h: &Harness) -> Navigator<Store, FakeApi> {
        Navigator::new(Arc::clone(&h.manager), Arc::clone(&h.api), &h.config)
    }

    #[tokio::test]
    async fn test_loading_before_hydration() {
        let h = Harness::new();
        let nav = navigator(&h);
        assert_eq!(
            nav.open("/doctor").await,
            NavigationOutcome::Shown(Screen::Loading)
        );
    }

    #[tokio::test]
    async fn test_signed_out_settles_on_login() {
        let h = Harness::new();
        h.manager.initialize().await;
        let nav = navigator(&h);

        assert_eq!(
            nav.open("/patient").await,
            NavigationOutcome::Shown(Screen::Redirect {
                to: Destination::Login,
                from: Some("/patient".into()),
            })
        );
        assert_eq!(
            nav.settle("/patient").await.unwrap(),
            NavigationOutcome::Shown(Screen::View(View::Login))
        );
        assert_eq!(nav.current(), Screen::View(View::Login));
    }

    #[tokio::test]
    async fn test_root_goes_to_login_then_dashboard() {
        let h = Harness::signed_in(Some(Role::Doctor)).await;
        let nav = navigator(&h);
        // "/" -> /login -> bounced to /doctor
        assert_eq!(
            nav.settle("/").await.unwrap(),
            NavigationOutcome::Shown(Screen::View(View::Dashboard(Role::Doctor)))
        );
    }

    #[tokio::test]
    async fn test_wrong_role_settles_on_own_dashboard() {
        let h = Harness::signed_in(Some(Role::Doctor)).await;
        let nav = navigator(&h);
        assert_eq!(
            nav.settle("/patient").await.unwrap(),
            NavigationOutcome::Shown(Screen::View(View::Dashboard(Role::Doctor)))
        );
    }

    #[tokio::test]
    async fn test_no_role_settles_on_role_selection() {
        let h = Harness::signed_in(None).await;
        let nav = navigator(&h);
        assert_eq!(
            nav.settle("/doctor").await.unwrap(),
            NavigationOutcome::Shown(Screen::View(View::RoleSelection))
        );
        assert_eq!(
            nav.settle("/role-selection").await.unwrap(),
            NavigationOutcome::Shown(Screen::View(View::RoleSelection))
        );
    }

    #[tokio::test]
    async fn test_profile_outage_settles_on_registration() {
        let h = Harness::signed_in(Some(Role::Patient)).await;
        h.api.profile(ProfileReply::ServerError);
        let nav = navigator(&h);
        assert_eq!(
            nav.settle("/patient").await.unwrap(),
            NavigationOutcome::Shown(Screen::View(View::Registration(Role::Patient)))
        );
    }

    #[tokio::test]
    async fn test_redirect_hop_limit() {
        let h = Harness::with_config(AuthConfig {
            max_redirects: 0,
            ..AuthConfig::default()
        });
        h.manager.initialize().await;
        let nav = navigator(&h);
        assert!(matches!(
            nav.settle("/unknown").await,
            Err(AuthError::RedirectLoop)
        ));
    }

    #[tokio::test]
    async fn test_stale_probe_is_superseded() {
        let h = Harness::signed_in(Some(Role::Doctor)).await;
        let gate = Arc::new(Notify::new());
        *h.api.probe_gate.lock().unwrap() = Some(Arc::clone(&gate));
        let nav = Arc::new(navigator(&h));

        let first = tokio::spawn({
            let nav = Arc::clone(&nav);
            async move { nav.open("/doctor").await }
        });
        while h.api.profile_calls.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(nav.current(), Screen::Loading);

        // newer navigation while the probe is out
        let second = nav.open("/login").await;
        assert_eq!(
            second,
            NavigationOutcome::Shown(Screen::Redirect {
                to: Destination::Dashboard(Role::Doctor),
                from: None,
            })
        );

        gate.notify_one();
        assert_eq!(first.await.unwrap(), NavigationOutcome::Superseded);
        assert_eq!(
            nav.current(),
            Screen::Redirect {
                to: Destination::Dashboard(Role::Doctor),
                from: None,
            }
        );
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use super::fakes::*;
    use crate::application::oauth_callback::{CallbackOutcome, GoogleCallbackUseCase};
    use crate::application::register_profile::RegisterProfileUseCase;
    use crate::domain::entity::{PatientRegistration, Registration};
    use crate::domain::route::Destination;
    use crate::domain::value_object::Role;
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_callback_signs_in() {
        let h = Harness::new();
        h.manager.initialize().await;
        let callback = GoogleCallbackUseCase::new(Arc::clone(&h.manager));

        let url = format!(
            "http://localhost:3000/google-callback?token={}",
            live_token("u1", Some(Role::Patient))
        );
        let outcome = callback.execute(&url).await;
        assert!(matches!(outcome, CallbackOutcome::SignedIn(_)));
        assert_eq!(outcome.redirect(), Destination::Dashboard(Role::Patient));
        assert!(h.manager.auth_status().await.is_authenticated);
    }

    #[tokio::test]
    async fn test_callback_failures_go_to_login() {
        let h = Harness::new();
        h.manager.initialize().await;
        let callback = GoogleCallbackUseCase::new(Arc::clone(&h.manager));

        let outcome = callback.execute("/google-callback").await;
        assert_eq!(outcome.redirect(), Destination::Login);

        let outcome = callback.execute("?token=garbage").await;
        assert!(matches!(outcome, CallbackOutcome::Failed(AuthError::Decode(_))));
        assert_eq!(outcome.redirect(), Destination::Login);
        assert!(!h.manager.auth_status().await.is_authenticated);
    }

    fn patient_form() -> Registration {
        Registration::Patient(PatientRegistration {
            full_name: "Ada".into(),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_register_profile() {
        let h = Harness::signed_in(Some(Role::Patient)).await;
        let register = RegisterProfileUseCase::new(Arc::clone(&h.manager), Arc::clone(&h.api));

        let next = register.execute(&patient_form()).await.unwrap();
        assert_eq!(next, Destination::Dashboard(Role::Patient));
        assert_eq!(h.api.registered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_profile_rejections() {
        let h = Harness::signed_in(Some(Role::Doctor)).await;
        let register = RegisterProfileUseCase::new(Arc::clone(&h.manager), Arc::clone(&h.api));
        assert!(matches!(
            register.execute(&patient_form()).await,
            Err(AuthError::RoleMismatch {
                expected: Role::Patient,
                actual: Role::Doctor
            })
        ));

        let h = Harness::signed_in(Some(Role::Patient)).await;
        *h.api.register_reply.lock().unwrap() = Some("Profile already exists");
        let register = RegisterProfileUseCase::new(Arc::clone(&h.manager), Arc::clone(&h.api));
        let err = register.execute(&patient_form()).await.unwrap_err();
        assert_eq!(err.user_message(), "Profile already exists");

        let h = Harness::signed_in(None).await;
        let register = RegisterProfileUseCase::new(Arc::clone(&h.manager), Arc::clone(&h.api));
        assert!(matches!(
            register.execute(&patient_form()).await,
            Err(AuthError::RoleNotSelected)
        ));
    }

    #[tokio::test]
    async fn test_register_profile_signed_out() {
        let h = Harness::new();
        h.manager.initialize().await;
        let register = RegisterProfileUseCase::new(Arc::clone(&h.manager), Arc::clone(&h.api));
        assert!(matches!(
            register.execute(&patient_form()).await,
            Err(AuthError::NotAuthenticated)
        ));
    }
}
