//! ClearKey license document builder
//!
//! Turns static `keyId:key` hex pairs (the `inputstream.adaptive.license_key`
//! form used by IPTV playlists) into the W3C ClearKey JSON license that
//! players accept in place of a license server response.

use serde::Serialize;
use tracing::debug;

use super::codec::{decode_hex, encode_base64url};
use crate::errors::{DrmError, DrmResult};

/// One decoded key id / content key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearKeyPair {
    pub key_id: Vec<u8>,
    pub key: Vec<u8>,
}

#[derive(Serialize)]
struct ClearKeyLicense {
    keys: Vec<ClearKeyEntry>,
    #[serde(rename = "type")]
    license_type: &'static str,
}

#[derive(Serialize)]
struct ClearKeyEntry {
    kty: &'static str,
    k: String,
    kid: String,
}

/// Parse comma-separated `keyId:key` hex pairs.
///
/// Blank segments (for example a trailing comma) are skipped. A single bad
/// pair fails the whole set.
pub fn parse_key_pairs(material: &str) -> DrmResult<Vec<ClearKeyPair>> {
    let mut pairs = Vec::new();

    for segment in material.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (key_id, key) = segment
            .split_once(':')
            .ok_or_else(|| DrmError::MalformedKeyPair {
                pair: segment.to_string(),
            })?;

        pairs.push(ClearKeyPair {
            key_id: decode_hex("key id", key_id)?,
            key: decode_hex("key", key)?,
        });
    }

    if pairs.is_empty() {
        return Err(DrmError::MissingKeyMaterial {
            scheme: "clearkey".to_string(),
        });
    }

    Ok(pairs)
}

/// Build the ClearKey license JSON for one or more `keyId:key` pairs.
///
/// ```rust
/// use m3u_channels::drm::build_clearkey_license;
///
/// let license = build_clearkey_license(
///     "00112233445566778899aabbccddeeff:ffeeddccbbaa99887766554433221100",
/// ).unwrap();
/// assert_eq!(
///     license,
///     r#"{"keys":[{"kty":"oct","k":"_-7dzLuqmYh3ZlVEMyIRAA","kid":"ABEiM0RVZneImaq7zN3u_w"}],"type":"temporary"}"#
/// );
/// ```
pub fn build_clearkey_license(material: &str) -> DrmResult<String> {
    let pairs = parse_key_pairs(material)?;
    debug!("Building ClearKey license with {} key(s)", pairs.len());

    let license = ClearKeyLicense {
        keys: pairs
            .iter()
            .map(|pair| ClearKeyEntry {
                kty: "oct",
                k: encode_base64url(&pair.key),
                kid: encode_base64url(&pair.key_id),
            })
            .collect(),
        license_type: "temporary",
    };

    serde_json::to_string(&license).map_err(|e| DrmError::LicenseEncoding {
        message: e.to_string(),
    })
}
