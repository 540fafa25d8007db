//! What the session store holds between runs

use crate::domain::entity::session_record::SessionRecord;
use crate::domain::value_object::Credential;

/// Credential plus the cached record decoded from it.
///
/// `record` is `None` when only the credential survived (older writes, or a
/// store edited by hand); the manager decodes it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSession {
    pub credential: Credential,
    pub record: Option<SessionRecord>,
}

impl StoredSession {
    pub fn new(credential: Credential, record: SessionRecord) -> Self {
        Self {
            credential,
            record: Some(record),
        }
    }
}

/// Backend reply to a role change: a fresh credential and the server's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGrant {
    pub credential: Credential,
    pub record: SessionRecord,
}
