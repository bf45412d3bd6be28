//! Hex and URL-safe base64 conversions for DRM key material

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::errors::{DrmError, DrmResult};

/// Decode a hex string (either case) into raw bytes.
///
/// `field` names the value in error messages (`"key"`, `"key id"`).
pub fn decode_hex(field: &'static str, input: &str) -> DrmResult<Vec<u8>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DrmError::InvalidHex {
            field,
            message: "empty value".to_string(),
        });
    }
    hex::decode(input).map_err(|e| DrmError::InvalidHex {
        field,
        message: e.to_string(),
    })
}

/// Encode bytes as URL-safe base64 without padding.
pub fn encode_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex string straight to unpadded base64url.
pub fn hex_to_base64url(field: &'static str, input: &str) -> DrmResult<String> {
    decode_hex(field, input).map(|bytes| encode_base64url(&bytes))
}
