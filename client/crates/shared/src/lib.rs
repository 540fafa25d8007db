//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of client vocabulary:
//! - Common error types and result aliases
//! - Typed identifiers for records issued by the backend
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all client modules.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
