//! Backend DTOs (Data Transfer Objects)
//!
//! The backend wraps every answer in `{ success, message?, data?, ... }`.
//! Replies are interpreted here once, so the rest of the crate only sees
//! domain types or an `AuthError`.

use kernel::error::kind::ErrorKind;
use platform::client::ApiReply;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::domain::entity::{RoleGrant, SessionRecord};
use crate::domain::value_object::{Credential, Role};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Requests
// ============================================================================

/// Role update request
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

// ============================================================================
// Responses
// ============================================================================

/// Response envelope
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<JsonValue>,
    pub token: Option<String>,
    pub user: Option<JsonValue>,
}

impl Envelope {
    /// Accept a 2xx reply that says `success: true`; anything else is a rejection.
    pub fn from_reply(reply: ApiReply) -> AuthResult<Self> {
        let ok = reply.is_success();
        let status = reply.status;
        let envelope = Envelope::from_body(reply.body);

        if ok && envelope.success {
            return Ok(envelope);
        }

        let kind = if ok {
            ErrorKind::BadRequest
        } else {
            ErrorKind::from_status_code(status)
        };
        Err(AuthError::Rejected {
            kind,
            message: envelope.message,
        })
    }

    /// Pick the envelope fields out of a reply body one at a time, so a
    /// field of the wrong type drops only that field.
    pub fn from_body(body: JsonValue) -> Self {
        let JsonValue::Object(mut fields) = body else {
            return Envelope::default();
        };

        let success = match fields.remove("success") {
            Some(JsonValue::Bool(flag)) => flag,
            None | Some(JsonValue::Null) => false,
            Some(other) => {
                tracing::warn!(value = %other, "Ignoring non-boolean `success` in reply");
                false
            }
        };

        Envelope {
            success,
            message: string_field(&mut fields, "message"),
            data: fields.remove("data").filter(|v| !v.is_null()),
            token: string_field(&mut fields, "token"),
            user: fields.remove("user").filter(|v| !v.is_null()),
        }
    }

    /// Fresh credential and server record from a role update
    pub fn into_role_grant(self) -> AuthResult<RoleGrant> {
        let token = self
            .token
            .ok_or_else(|| AuthError::Internal("role update response has no token".to_string()))?;
        let user = self
            .user
            .ok_or_else(|| AuthError::Internal("role update response has no user".to_string()))?;

        let credential = Credential::parse(token)?;
        let record: SessionRecord = serde_json::from_value(user)
            .map_err(|e| AuthError::Internal(format!("role update user: {e}")))?;
        Ok(RoleGrant { credential, record })
    }
}

fn string_field(fields: &mut serde_json::Map<String, JsonValue>, name: &'static str) -> Option<String> {
    match fields.remove(name)? {
        JsonValue::String(text) => Some(text),
        JsonValue::Null => None,
        other => {
            tracing::warn!(field = name, value = %other, "Ignoring non-string field in reply");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply(status: u16, body: JsonValue) -> ApiReply {
        ApiReply { status, body }
    }

    #[test]
    fn test_success_envelope() {
        let envelope = Envelope::from_reply(reply(200, json!({ "success": true, "data": { "a": 1 } })))
            .unwrap();
        assert_eq!(envelope.data, Some(json!({ "a": 1 })));
    }

    #[test]
    fn test_success_false_on_200() {
        let err = Envelope::from_reply(reply(
            200,
            json!({ "success": false, "message": "Role already assigned" }),
        ))
        .unwrap_err();
        assert!(matches!(
            err,
            AuthError::Rejected { kind: ErrorKind::BadRequest, message: Some(ref m) } if m == "Role already assigned"
        ));
    }

    #[test]
    fn test_http_error_kinds() {
        let err = Envelope::from_reply(reply(401, json!({ "message": "jwt expired" }))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.user_message(), "jwt expired");

        let err = Envelope::from_reply(reply(503, JsonValue::Null)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);

        // a 2xx without the success flag is not trusted
        assert!(Envelope::from_reply(reply(200, json!({ "data": {} }))).is_err());
    }

    #[test]
    fn test_mistyped_field_keeps_success() {
        let envelope = Envelope::from_reply(reply(
            200,
            json!({ "success": true, "message": { "text": "ok" }, "data": { "a": 1 } }),
        ))
        .unwrap();
        assert_eq!(envelope.message, None);
        assert_eq!(envelope.data, Some(json!({ "a": 1 })));

        let envelope = Envelope::from_body(json!({ "success": "yes", "token": 5 }));
        assert!(!envelope.success);
        assert_eq!(envelope.token, None);
    }

    #[test]
    fn test_role_grant() {
        let envelope = Envelope {
            success: true,
            token: Some("a.b.c".into()),
            user: Some(json!({ "_id": "u1", "email": "p@x.y", "role": "patient" })),
            ..Default::default()
        };
        let grant = envelope.into_role_grant().unwrap();
        assert_eq!(grant.credential.as_str(), "a.b.c");
        assert_eq!(grant.record.role, Some(Role::Patient));
    }

    #[test]
    fn test_role_grant_incomplete() {
        let envelope = Envelope {
            success: true,
            user: Some(json!({ "_id": "u1" })),
            ..Default::default()
        };
        assert!(matches!(envelope.into_role_grant(), Err(AuthError::Internal(_))));
    }

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(UpdateRoleRequest { role: Role::Doctor }).unwrap();
        assert_eq!(body, json!({ "role": "doctor" }));
    }
}
