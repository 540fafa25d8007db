//! REST API client
//!
//! Thin wrapper over `reqwest` for the JSON backend: resolves endpoint paths
//! against a configured base URL, attaches bearer credentials, and hands the
//! status code plus parsed body back to the caller. Interpreting the body
//! (success envelopes, messages) is the caller's job.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value as JsonValue;

pub use reqwest::Url;

/// Error when talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// Base URL or endpoint path could not be turned into a URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request never produced a response (DNS, connect, TLS, timeout)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl HttpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Transport(e) if e.is_timeout())
    }
}

/// Response as seen by the client: status code and JSON body.
///
/// A body that is not JSON (an HTML error page from a proxy, an empty 204)
/// is reported as `JsonValue::Null` rather than as an error.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: u16,
    pub body: JsonValue,
}

impl ApiReply {
    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// JSON API client bound to one backend base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for `base_url`.
    ///
    /// The base URL is treated as a directory: `http://host:5001` and
    /// `http://host:5001/` both resolve `api/update-role` to
    /// `http://host:5001/api/update-role`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| HttpError::InvalidUrl(format!("{base}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(HttpError::InvalidUrl(base));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an endpoint path relative to the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, HttpError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| HttpError::InvalidUrl(format!("{path}: {e}")))
    }

    /// GET `path`
    pub async fn get(&self, path: &str, bearer: Option<&str>) -> Result<ApiReply, HttpError> {
        let url = self.endpoint(path)?;
        let mut request = self.http.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        Self::send(path, request).await
    }

    /// POST `body` as JSON to `path`
    pub async fn post_json<B>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<ApiReply, HttpError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let mut request = self.http.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        Self::send(path, request).await
    }

    async fn send(path: &str, request: reqwest::RequestBuilder) -> Result<ApiReply, HttpError> {
        let response = request.send().await.inspect_err(|e| {
            tracing::debug!(path = %path, error = %e, "Backend request failed");
        })?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::debug!(path = %path, status, error = %e, "Backend sent a non-JSON body");
                JsonValue::Null
            })
        };

        tracing::debug!(path = %path, status, "Backend responded");
        Ok(ApiReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_with_and_without_trailing_slash() {
        let a = client("http://localhost:5001");
        let b = client("http://localhost:5001/");
        assert_eq!(
            a.endpoint("api/update-role").unwrap().as_str(),
            "http://localhost:5001/api/update-role"
        );
        assert_eq!(
            b.endpoint("/api/update-role").unwrap().as_str(),
            "http://localhost:5001/api/update-role"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let c = client("https://example.com/backend");
        assert_eq!(
            c.endpoint("auth/google").unwrap().as_str(),
            "https://example.com/backend/auth/google"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ApiClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));

        let result = ApiClient::new("mailto:someone@example.com", Duration::from_secs(5));
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn test_reply_status_helpers() {
        let ok = ApiReply { status: 200, body: JsonValue::Null };
        let missing = ApiReply { status: 404, body: JsonValue::Null };
        let failed = ApiReply { status: 500, body: JsonValue::Null };
        assert!(ok.is_success());
        assert!(!missing.is_success());
        assert!(!missing.is_server_error());
        assert!(failed.is_server_error());
    }
}
