//! HTTP Account API
//!
//! `AccountApi` over the backend's REST endpoints.

use platform::client::ApiClient;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Registration, RoleGrant};
use crate::domain::profile::ProfileStatus;
use crate::domain::repository::AccountApi;
use crate::domain::value_object::{Credential, Role};
use crate::error::AuthResult;
use crate::infra::dto::{Envelope, UpdateRoleRequest};

const UPDATE_ROLE_PATH: &str = "api/update-role";
const LOGOUT_PATH: &str = "api/logout";

/// Backend-backed account API
#[derive(Debug, Clone)]
pub struct HttpAccountApi {
    client: ApiClient,
}

impl HttpAccountApi {
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        let client = ApiClient::new(&config.api_base_url, config.request_timeout)?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl AccountApi for HttpAccountApi {
    async fn update_role(&self, credential: &Credential, role: Role) -> AuthResult<RoleGrant> {
        let reply = self
            .client
            .post_json(
                UPDATE_ROLE_PATH,
                &UpdateRoleRequest { role },
                Some(credential.as_str()),
            )
            .await?;
        Envelope::from_reply(reply)?.into_role_grant()
    }

    async fn fetch_profile(
        &self,
        credential: &Credential,
        role: Role,
    ) -> AuthResult<ProfileStatus> {
        let reply = self
            .client
            .get(&role.profile_endpoint(), Some(credential.as_str()))
            .await?;

        let server_error = reply.is_server_error();
        match Envelope::from_reply(reply) {
            Ok(envelope) => Ok(ProfileStatus::Found(envelope.data.unwrap_or_default())),
            Err(e) if server_error => Err(e),
            // 4xx or `success: false`: nothing registered for this role yet
            Err(_) => Ok(ProfileStatus::Missing),
        }
    }

    async fn register_profile(
        &self,
        credential: &Credential,
        registration: &Registration,
    ) -> AuthResult<()> {
        let reply = self
            .client
            .post_json(
                &registration.role().register_endpoint(),
                registration,
                Some(credential.as_str()),
            )
            .await?;
        Envelope::from_reply(reply)?;
        Ok(())
    }

    async fn sign_out(&self, credential: &Credential) -> AuthResult<()> {
        // reply body is irrelevant; only reaching the backend matters
        self.client
            .get(LOGOUT_PATH, Some(credential.as_str()))
            .await?;
        Ok(())
    }
}
