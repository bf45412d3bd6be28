//! Inline `URL|key=value|key=value` parameters
//!
//! Many IPTV playlists append request headers to the stream URL with pipes,
//! Kodi style. The same syntax is used for persisted channel descriptors, so
//! this parser serves both playlist ingestion and descriptor decoding.

use crate::models::headers::{COOKIE, ORIGIN, REFERER, USER_AGENT};
use crate::models::{DrmParams, HttpHeaders};

/// A raw line split into its URL, headers and DRM fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineParams {
    pub url: String,
    /// May include `User-Agent`; callers decide where it belongs
    pub headers: HttpHeaders,
    pub drm: DrmParams,
}

/// What a `key=value` parameter means, whichever syntax carried it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamKey {
    /// A header with a canonical spelling
    Header(&'static str),
    DrmScheme,
    DrmLicense,
    /// Any other header name
    Custom,
}

/// Classify a parameter key case-insensitively.
///
/// `#EXTHTTP` objects and inline pipe segments share this table, so a parsed
/// channel already holds what decoding its descriptor gives back.
pub(crate) fn classify_key(key: &str) -> ParamKey {
    match key.to_ascii_lowercase().as_str() {
        "referer" | "referrer" => ParamKey::Header(REFERER),
        "user-agent" | "useragent" => ParamKey::Header(USER_AGENT),
        "origin" => ParamKey::Header(ORIGIN),
        "cookie" => ParamKey::Header(COOKIE),
        "drmscheme" => ParamKey::DrmScheme,
        "drmlicense" => ParamKey::DrmLicense,
        _ => ParamKey::Custom,
    }
}

/// Split `URL|k1=v1|k2=v2` into URL, headers and DRM parameters.
///
/// Keys are matched case-insensitively against a fixed synonym table
/// (`referrer` -> `Referer`, `useragent` -> `User-Agent`, `drmScheme`,
/// `drmLicense`, ...). Unknown keys are kept as headers with their original
/// spelling. Keys and values are trimmed. Segments without `=` or with an
/// empty key are ignored, and only the first `=` splits, so cookie values
/// like `a=1; b=2` stay intact.
///
/// ```rust
/// use m3u_channels::ingestor::inline_params::parse_inline_params;
///
/// let params = parse_inline_params("http://example.com/live.m3u8|referrer=https://site.example/|Cookie=a=1; b=2");
/// assert_eq!(params.url, "http://example.com/live.m3u8");
/// assert_eq!(params.headers.get("Referer"), Some("https://site.example/"));
/// assert_eq!(params.headers.get("Cookie"), Some("a=1; b=2"));
/// ```
pub fn parse_inline_params(line: &str) -> InlineParams {
    let mut segments = line.split('|');
    let url = segments.next().unwrap_or_default().trim().to_string();

    let mut headers = HttpHeaders::new();
    let mut drm = DrmParams::default();

    for segment in segments {
        let Some((key, value)) = segment.trim().split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            continue;
        }

        match classify_key(key) {
            ParamKey::Header(name) => headers.insert(name, value),
            ParamKey::DrmScheme => drm.scheme = Some(value.to_string()),
            ParamKey::DrmLicense => drm.license = Some(value.to_string()),
            ParamKey::Custom => headers.insert(key, value),
        }
    }

    InlineParams { url, headers, drm }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Referrer", ParamKey::Header(REFERER))]
    #[case("USERAGENT", ParamKey::Header(USER_AGENT))]
    #[case("drmScheme", ParamKey::DrmScheme)]
    #[case("DRMLICENSE", ParamKey::DrmLicense)]
    #[case("X-Token", ParamKey::Custom)]
    fn test_classify_key(#[case] key: &str, #[case] expected: ParamKey) {
        assert_eq!(classify_key(key), expected);
    }

    #[test]
    fn test_plain_url() {
        let params = parse_inline_params("  http://example.com/live.m3u8  ");
        assert_eq!(params.url, "http://example.com/live.m3u8");
        assert!(params.headers.is_empty());
        assert!(params.drm.is_empty());
    }

    #[rstest]
    #[case("referer", "Referer")]
    #[case("Referrer", "Referer")]
    #[case("user-agent", "User-Agent")]
    #[case("UserAgent", "User-Agent")]
    #[case("ORIGIN", "Origin")]
    #[case("cookie", "Cookie")]
    fn test_synonyms_are_normalized(#[case] key: &str, #[case] expected: &str) {
        let params = parse_inline_params(&format!("http://example.com/a.ts|{key}=value"));
        assert_eq!(params.headers.names().collect::<Vec<_>>(), vec![expected]);
        assert_eq!(params.headers.get(expected), Some("value"));
    }

    #[test]
    fn test_unknown_keys_keep_their_case() {
        let params = parse_inline_params("http://example.com/a.ts|x-Custom-Thing=1|Authorization=Bearer abc");
        assert_eq!(
            params.headers.iter().collect::<Vec<_>>(),
            vec![("x-Custom-Thing", "1"), ("Authorization", "Bearer abc")]
        );
    }

    #[test]
    fn test_drm_fields() {
        let params = parse_inline_params(
            "https://cdn.example.com/manifest.mpd|drmScheme=clearkey|DRMLICENSE=0011:2233",
        );
        assert_eq!(params.drm.scheme.as_deref(), Some("clearkey"));
        assert_eq!(params.drm.license.as_deref(), Some("0011:2233"));
        assert!(params.headers.is_empty());
    }

    #[test]
    fn test_cookie_is_not_split() {
        let params = parse_inline_params("http://example.com/a.ts|cookie=session=abc; path=/; hdnts=exp=1~acl=/*");
        assert_eq!(params.headers.len(), 1);
        assert_eq!(
            params.headers.get("Cookie"),
            Some("session=abc; path=/; hdnts=exp=1~acl=/*")
        );
    }

    #[test]
    fn test_segments_without_equals_or_key_are_ignored() {
        let params = parse_inline_params("http://example.com/a.ts|garbage||=orphan|Referer=ok|");
        assert_eq!(params.headers.iter().collect::<Vec<_>>(), vec![("Referer", "ok")]);
    }

    #[test]
    fn test_later_segments_win() {
        let params = parse_inline_params("http://example.com/a.ts|Referer=one|referrer=two");
        assert_eq!(params.headers.len(), 1);
        assert_eq!(params.headers.get("Referer"), Some("two"));
    }
}
