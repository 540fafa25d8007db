//! Session Record Entity
//!
//! The client-held view of who is signed in. Built from credential claims at
//! login, or taken verbatim from the backend after a role change.

use serde::{Deserialize, Serialize};

use crate::domain::entity::claims::Claims;
use crate::domain::value_object::{role, Role, UserId};

/// Session record, persisted next to the credential (camelCase JSON)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Backend account id (`_id` in raw documents)
    #[serde(alias = "_id")]
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// `None` until the user picks a role
    #[serde(
        default,
        deserialize_with = "role::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl SessionRecord {
    pub fn has_role(&self) -> bool {
        self.role.is_some()
    }

    /// Best available name for greetings: full name, then first/last, then email.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = self.name.as_deref().filter(|n| !n.trim().is_empty()) {
            return Some(name.to_string());
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        if !parts.is_empty() {
            return Some(parts.join(" "));
        }
        self.email.clone()
    }
}

impl From<&Claims> for SessionRecord {
    fn from(claims: &Claims) -> Self {
        Self {
            id: claims.id.clone(),
            email: claims.email.clone(),
            role: claims.role,
            name: claims.name.clone(),
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: &str) -> SessionRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_backend_user_document() {
        let r = record(
            r#"{"_id":"65f1","email":"a@b.c","role":"patient","firstName":"Ada","lastName":"L"}"#,
        );
        assert_eq!(r.id.as_str(), "65f1");
        assert_eq!(r.role, Some(Role::Patient));
        assert_eq!(r.display_name().as_deref(), Some("Ada L"));
    }

    #[test]
    fn test_role_null_empty_or_absent() {
        assert_eq!(record(r#"{"id":"1","role":null}"#).role, None);
        assert_eq!(record(r#"{"id":"1","role":""}"#).role, None);
        assert_eq!(record(r#"{"id":"1"}"#).role, None);
        assert!(serde_json::from_str::<SessionRecord>(r#"{"id":"1","role":"admin"}"#).is_err());
    }

    #[test]
    fn test_missing_id_rejected() {
        assert!(serde_json::from_str::<SessionRecord>(r#"{"email":"a@b.c"}"#).is_err());
    }

    #[test]
    fn test_serialized_form_reloads() {
        let r = record(r#"{"id":"7","email":"x@y.z","role":"doctor","name":"Dr X"}"#);
        let json = serde_json::to_string(&r).unwrap();
        assert!(!json.contains("firstName"));
        assert_eq!(record(&json), r);
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(
            record(r#"{"id":"1","name":"Grace","email":"g@h.i"}"#).display_name().as_deref(),
            Some("Grace")
        );
        assert_eq!(
            record(r#"{"id":"1","name":" ","email":"g@h.i"}"#).display_name().as_deref(),
            Some("g@h.i")
        );
        assert_eq!(record(r#"{"id":"1"}"#).display_name(), None);
    }
}
