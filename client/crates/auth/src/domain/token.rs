//! Token Codec
//!
//! Reads the payload of a `header.payload.signature` bearer credential.
//! Signatures are the backend's concern; the client only needs the claims
//! to decide where to route.

use chrono::Utc;
use platform::encoding::from_base64url;
use serde_json::{Map, Value as JsonValue};

use crate::domain::entity::Claims;
use crate::domain::value_object::{Role, UserId};

/// Why a credential could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("expected three dot-separated segments")]
    Malformed,

    #[error("credential is unsigned")]
    Unsigned,

    #[error("segment is not base64url")]
    Encoding,

    #[error("invalid payload: {0}")]
    Payload(String),

    #[error("missing claim `{0}`")]
    MissingClaim(&'static str),

    #[error("invalid claim `{claim}`: {reason}")]
    InvalidClaim { claim: &'static str, reason: String },
}

/// Current wall-clock time in Unix milliseconds
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Decode the claims of `credential`
pub fn decode(credential: &str) -> Result<Claims, DecodeError> {
    let mut segments = credential.trim().split('.');
    let (Some(header), Some(payload), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::Malformed);
    };

    if signature.is_empty() {
        return Err(DecodeError::Unsigned);
    }

    let header = json_object(header)?;
    if header
        .get("alg")
        .and_then(JsonValue::as_str)
        .is_some_and(|alg| alg.eq_ignore_ascii_case("none"))
    {
        return Err(DecodeError::Unsigned);
    }

    let payload = json_object(payload)?;
    claims_from(&payload)
}

/// `exp * 1000 > now`. Any decode failure, or a missing `exp`, is `false`.
pub fn is_valid(credential: &str) -> bool {
    is_valid_at(credential, now_ms())
}

/// [`is_valid`] against a fixed instant
pub fn is_valid_at(credential: &str, now_ms: i64) -> bool {
    decode(credential).is_ok_and(|claims| !claims.is_expired_at(now_ms))
}

fn json_object(segment: &str) -> Result<Map<String, JsonValue>, DecodeError> {
    let bytes = from_base64url(segment).map_err(|_| DecodeError::Encoding)?;
    match serde_json::from_slice(&bytes) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(_) => Err(DecodeError::Payload("not a JSON object".to_string())),
        Err(e) => Err(DecodeError::Payload(e.to_string())),
    }
}

fn claims_from(payload: &Map<String, JsonValue>) -> Result<Claims, DecodeError> {
    let id = match payload.get("id") {
        None | Some(JsonValue::Null) => return Err(DecodeError::MissingClaim("id")),
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
        Some(_) => {
            return Err(DecodeError::InvalidClaim {
                claim: "id",
                reason: "expected a string or integer".to_string(),
            })
        }
    };
    let id = UserId::parse(id).map_err(|e| DecodeError::InvalidClaim {
        claim: "id",
        reason: e.to_string(),
    })?;

    let role = match optional_string(payload, "role")?.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(code) => Some(Role::from_code(code).ok_or_else(|| DecodeError::InvalidClaim {
            claim: "role",
            reason: format!("unknown role `{code}`"),
        })?),
    };

    let expires_at_ms = match payload.get("exp") {
        None | Some(JsonValue::Null) => None,
        Some(value) => {
            let seconds = value.as_f64().ok_or_else(|| DecodeError::InvalidClaim {
                claim: "exp",
                reason: "expected a number".to_string(),
            })?;
            Some((seconds * 1000.0) as i64)
        }
    };

    Ok(Claims {
        id,
        email: optional_string(payload, "email")?,
        role,
        name: optional_string(payload, "name")?,
        first_name: optional_string(payload, "firstName")?,
        last_name: optional_string(payload, "lastName")?,
        expires_at_ms,
    })
}

fn optional_string(
    payload: &Map<String, JsonValue>,
    claim: &'static str,
) -> Result<Option<String>, DecodeError> {
    match payload.get(claim) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DecodeError::InvalidClaim {
            claim,
            reason: "expected a string".to_string(),
        }),
    }
}

/// Test helper: build an HS256-shaped credential around `payload`.
#[cfg(test)]
pub(crate) fn encode_for_test(payload: &JsonValue) -> String {
    use platform::encoding::to_base64url;

    let header = to_base64url(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = to_base64url(payload.to_string().as_bytes());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}
