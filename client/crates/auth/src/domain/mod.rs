//! Domain Layer
//!
//! Contains entities, value objects, the token codec, routing rules and
//! repository traits.

pub mod entity;
pub mod profile;
pub mod repository;
pub mod route;
pub mod token;
pub mod value_object;

// Re-exports
pub use entity::{Claims, SessionRecord, StoredSession};
pub use repository::{AccountApi, SessionStore};
pub use route::{AuthorizationDecision, Destination, RouteRule, SessionView};
