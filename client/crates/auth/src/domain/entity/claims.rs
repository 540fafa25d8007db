use crate::domain::value_object::{Role, UserId};

/// Claims read from a credential payload.
///
/// Only what routing needs is kept. The signature is never checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub id: UserId,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Expiry in Unix milliseconds (`exp * 1000`)
    pub expires_at_ms: Option<i64>,
}

impl Claims {
    /// A credential without `exp` never counts as live.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        match self.expires_at_ms {
            Some(exp) => exp <= now_ms,
            None => true,
        }
    }
}
