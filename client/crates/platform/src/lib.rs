//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations for the client:
//! - REST API client (JSON over HTTP, bearer credentials)
//! - Durable key/value storage (file-backed and in-memory)
//! - Base64url helpers for compact token segments

pub mod client;
pub mod encoding;
pub mod storage;
