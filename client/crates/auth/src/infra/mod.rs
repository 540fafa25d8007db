//! Infrastructure Layer
//!
//! Backend API and durable storage implementations.

pub mod dto;
pub mod http;
pub mod storage;

pub use http::HttpAccountApi;
pub use storage::KvSessionStore;
