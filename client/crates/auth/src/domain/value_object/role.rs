use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Account role. Chosen once per account on the role selection screen and
/// embedded in every credential issued afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Doctor, Role::Patient];

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }

    /// Parse a role code. `None` for anything that is not a known role.
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "doctor" => Some(Role::Doctor),
            "patient" => Some(Role::Patient),
            _ => None,
        }
    }

    /// Backend endpoint that answers whether this role's profile exists
    pub fn profile_endpoint(&self) -> String {
        format!("api/{}/profile", self.code())
    }

    /// Backend endpoint that creates this role's profile
    pub fn register_endpoint(&self) -> String {
        format!("api/{}/register", self.code())
    }
}

/// Serde helper for role fields the backend may leave `null`, `""` or absent.
/// All three mean "no role yet"; an unknown code is an error.
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let code: Option<String> = Option::deserialize(deserializer)?;
    match code.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(code) => Role::from_code(code)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown role `{code}`"))),
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_code(s.trim()).ok_or_else(|| AuthError::UnknownRole(s.to_string()))
    }
}
