//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Backend base URL
    pub api_base_url: String,
    /// OAuth entry path, relative to the base URL
    pub oauth_path: String,
    /// Storage key of the raw credential
    pub token_key: String,
    /// Storage key of the serialized session record
    pub user_key: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Redirect hops before navigation gives up
    pub max_redirects: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5001/".to_string(),
            oauth_path: "auth/google".to_string(),
            token_key: "token".to_string(),
            user_key: "user".to_string(),
            request_timeout: Duration::from_secs(15),
            max_redirects: 8,
        }
    }
}

impl AuthConfig {
    /// Create config for development (short timeout, local backend)
    pub fn development() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            ..Default::default()
        }
    }

    /// Config pointing at `api_base_url`, everything else default
    pub fn with_base_url(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    /// Where the browser goes to start Google sign-in
    pub fn oauth_url(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        let path = self.oauth_path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}
