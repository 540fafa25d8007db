//! Value Object Module

pub mod credential;
pub mod role;
pub mod user_id;

pub use credential::Credential;
pub use role::Role;
pub use user_id::UserId;
