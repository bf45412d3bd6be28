//! Deterministic channel identifiers
//!
//! A channel's id is derived from its stream URL and display name so that
//! re-fetching the same playlist yields the same ids, and anything keyed by
//! them (favorites, watch state) survives a refresh.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use strum::{Display, EnumString};

/// Prefix that keeps fallback ids apart from 32-character MD5 ids
pub const FALLBACK_ID_PREFIX: &str = "m3u_";

/// Which hash backs [`generate_id`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IdStrategy {
    /// Lowercase hex MD5 of `url|name`
    #[default]
    Md5,
    /// `m3u_` + hex of a 64-bit non-cryptographic hash of `url|name`
    Hash,
}

fn combined_key(stream_url: &str, name: &str) -> String {
    format!("{stream_url}|{name}")
}

/// Stable id for a channel: `hex(md5(stream_url + "|" + name))`
///
/// ```rust
/// use m3u_channels::utils::channel_id::generate_channel_id;
///
/// let id = generate_channel_id("http://example.com/live.m3u8", "News HD");
/// assert_eq!(id, "68e7358b2b5a3b150f10fffada4d556d");
/// ```
pub fn generate_channel_id(stream_url: &str, name: &str) -> String {
    format!("{:x}", md5::compute(combined_key(stream_url, name).as_bytes()))
}

/// Non-cryptographic variant of [`generate_channel_id`], prefixed with `m3u_`
pub fn generate_fallback_channel_id(stream_url: &str, name: &str) -> String {
    let mut hasher = DefaultHasher::new();
    combined_key(stream_url, name).hash(&mut hasher);
    format!("{FALLBACK_ID_PREFIX}{:016x}", hasher.finish())
}

/// Generate an id with the configured strategy
pub fn generate_id(strategy: IdStrategy, stream_url: &str, name: &str) -> String {
    match strategy {
        IdStrategy::Md5 => generate_channel_id(stream_url, name),
        IdStrategy::Hash => generate_fallback_channel_id(stream_url, name),
    }
}
