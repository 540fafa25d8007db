//! Session Store over key/value storage
//!
//! Credential and record live under two keys and are always written or
//! removed in one batch.

use platform::storage::{KeyValueStore, StorageError, Write};

use crate::application::config::AuthConfig;
use crate::domain::entity::{SessionRecord, StoredSession};
use crate::domain::repository::SessionStore;
use crate::domain::value_object::Credential;
use crate::error::AuthResult;

/// `SessionStore` backed by any `KeyValueStore`
#[derive(Debug)]
pub struct KvSessionStore<K>
where
    K: KeyValueStore + Sync,
{
    kv: K,
    token_key: String,
    user_key: String,
}

impl<K> KvSessionStore<K>
where
    K: KeyValueStore + Sync,
{
    pub fn new(kv: K, config: &AuthConfig) -> Self {
        Self {
            kv,
            token_key: config.token_key.clone(),
            user_key: config.user_key.clone(),
        }
    }

    pub fn inner(&self) -> &K {
        &self.kv
    }
}

impl<K> SessionStore for KvSessionStore<K>
where
    K: KeyValueStore + Sync,
{
    async fn save(&self, session: &StoredSession) -> AuthResult<()> {
        let user = match &session.record {
            Some(record) => Write::set(
                &self.user_key,
                serde_json::to_string(record).map_err(StorageError::from)?,
            ),
            None => Write::remove(&self.user_key),
        };
        self.kv
            .apply(&[Write::set(&self.token_key, session.credential.as_str()), user])
            .await?;
        Ok(())
    }

    async fn load(&self) -> AuthResult<Option<StoredSession>> {
        // one snapshot, so the pair always comes from the same save
        let mut values = self
            .kv
            .get_many(&[self.token_key.as_str(), self.user_key.as_str()])
            .await?
            .into_iter();
        let (Some(token), user) = (values.next().flatten(), values.next().flatten()) else {
            return Ok(None);
        };
        let credential = Credential::parse(token)?;

        let record = match user {
            Some(user) => Some(
                serde_json::from_str::<SessionRecord>(&user).map_err(StorageError::from)?,
            ),
            None => None,
        };

        Ok(Some(StoredSession { credential, record }))
    }

    async fn clear(&self) -> AuthResult<()> {
        self.kv
            .apply(&[Write::remove(&self.token_key), Write::remove(&self.user_key)])
            .await?;
        Ok(())
    }
}
