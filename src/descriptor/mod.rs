//! Persisted channel descriptors
//!
//! A descriptor is the single string a catalog stores per channel:
//!
//! ```text
//! <stream_url>|User-Agent=<ua>|<Header>=<value>|drmScheme=<scheme>|drmLicense=<license>
//! ```
//!
//! Segments are only present when set. Values are written verbatim; there is
//! no escaping, so a `|` inside a value cannot round-trip. Encoding logs a
//! warning when that happens.

use serde::Serialize;
use tracing::warn;

use crate::drm::{DrmSession, resolve_drm_session};
use crate::errors::DrmResult;
use crate::ingestor::inline_params::{InlineParams, parse_inline_params};
use crate::models::headers::USER_AGENT;
use crate::models::{DrmParams, HttpHeaders, ParsedChannel};
use crate::utils::UrlUtils;

pub const DRM_SCHEME_KEY: &str = "drmScheme";
pub const DRM_LICENSE_KEY: &str = "drmLicense";

/// Encode a channel's URL, request headers and DRM fields into a descriptor.
///
/// ```rust
/// use m3u_channels::descriptor::encode_descriptor;
/// use m3u_channels::models::ParsedChannel;
///
/// let mut channel = ParsedChannel {
///     stream_url: "http://example.com/live.m3u8".to_string(),
///     user_agent: Some("VLC/3.0".to_string()),
///     ..ParsedChannel::default()
/// };
/// channel.headers.insert("Referer", "https://site.example/");
///
/// assert_eq!(
///     encode_descriptor(&channel),
///     "http://example.com/live.m3u8|User-Agent=VLC/3.0|Referer=https://site.example/"
/// );
/// ```
pub fn encode_descriptor(channel: &ParsedChannel) -> String {
    let mut descriptor = channel.stream_url.clone();

    for (name, value) in channel.request_headers().iter() {
        push_segment(&mut descriptor, &channel.name, name, value);
    }
    if let Some(scheme) = &channel.drm.scheme {
        push_segment(&mut descriptor, &channel.name, DRM_SCHEME_KEY, scheme);
    }
    if let Some(license) = &channel.drm.license {
        push_segment(&mut descriptor, &channel.name, DRM_LICENSE_KEY, license);
    }

    descriptor
}

fn push_segment(descriptor: &mut String, channel_name: &str, key: &str, value: &str) {
    if value.contains('|') {
        warn!(
            "Channel '{}': value of '{}' contains '|' and will not decode intact",
            channel_name, key
        );
    }
    descriptor.push('|');
    descriptor.push_str(key);
    descriptor.push('=');
    descriptor.push_str(value);
}

/// A descriptor split back into its parts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodedDescriptor {
    pub url: String,
    /// Request headers including `User-Agent`
    pub headers: HttpHeaders,
    #[serde(skip_serializing_if = "DrmParams::is_empty")]
    pub drm: DrmParams,
}

impl DecodedDescriptor {
    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get(USER_AGENT)
    }

    /// Resolve the DRM fields into something a player can use.
    pub fn drm_session(&self) -> DrmResult<Option<DrmSession>> {
        resolve_drm_session(&self.drm)
    }
}

/// Decode a descriptor produced by [`encode_descriptor`].
///
/// Older descriptors carried DRM settings as `drmScheme` / `drmLicense` query
/// parameters on the URL itself. When the pipe segments leave a DRM field
/// unset, the query string fills it. The URL is returned as stored.
pub fn decode_descriptor(descriptor: &str) -> DecodedDescriptor {
    let InlineParams { url, headers, mut drm } = parse_inline_params(descriptor);

    if drm.scheme.is_none() {
        drm.scheme = UrlUtils::query_param(&url, DRM_SCHEME_KEY);
    }
    if drm.license.is_none() {
        drm.license = UrlUtils::query_param(&url, DRM_LICENSE_KEY);
    }

    DecodedDescriptor { url, headers, drm }
}
