//! Encoding Utilities
//!
//! Base64url helpers for the compact segments of bearer credentials.

use base64::{Engine, engine::general_purpose};

/// Encode bytes as unpadded base64url.
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a base64url segment.
///
/// Issuers disagree about padding, so trailing `=` is accepted and ignored.
pub fn from_base64url(segment: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(segment.trim_end_matches('='))
}
