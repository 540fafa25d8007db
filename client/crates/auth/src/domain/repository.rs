//! Repository Traits
//!
//! Ports to durable storage and the backend. Implementations are in the
//! infrastructure layer.

use crate::domain::entity::{Registration, RoleGrant, StoredSession};
use crate::domain::profile::ProfileStatus;
use crate::domain::value_object::{Credential, Role};
use crate::error::AuthResult;

/// Durable session storage trait
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Persist credential and record together
    async fn save(&self, session: &StoredSession) -> AuthResult<()>;

    /// Last saved session, if any
    async fn load(&self) -> AuthResult<Option<StoredSession>>;

    /// Remove credential and record. Idempotent.
    async fn clear(&self) -> AuthResult<()>;
}

/// Backend account API trait
#[trait_variant::make(AccountApi: Send)]
pub trait LocalAccountApi {
    /// Set the account role; the backend answers with a fresh credential
    async fn update_role(&self, credential: &Credential, role: Role) -> AuthResult<RoleGrant>;

    /// Probe the role profile
    async fn fetch_profile(&self, credential: &Credential, role: Role)
        -> AuthResult<ProfileStatus>;

    /// Create the role profile
    async fn register_profile(
        &self,
        credential: &Credential,
        registration: &Registration,
    ) -> AuthResult<()>;

    /// Tell the backend the session ended
    async fn sign_out(&self, credential: &Credential) -> AuthResult<()>;
}
