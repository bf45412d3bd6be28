//! Per-entry accumulator shared by the playlist parsers
//!
//! Directive lines (or JSON fields) fill an [`EntryState`]; the stream URL
//! finishes it into a [`ParsedChannel`]. The M3U parser swaps in a fresh
//! state after every URL line, so nothing leaks between channels.

use super::inline_params::InlineParams;
use crate::models::headers::USER_AGENT;
use crate::models::{DrmParams, HttpHeaders, ParsedChannel};

#[derive(Debug, Clone, Default)]
pub(crate) struct EntryState {
    pub name: String,
    pub logo: String,
    pub group: String,
    pub tvg_id: Option<String>,
    pub user_agent: Option<String>,
    pub headers: HttpHeaders,
    pub drm: DrmParams,
}

impl EntryState {
    /// Store a header, routing `User-Agent` to its dedicated field.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        if name.eq_ignore_ascii_case(USER_AGENT) {
            self.user_agent = Some(value.into());
        } else {
            self.headers.insert(name, value);
        }
    }

    /// Finish the entry with the parameters found on its URL line.
    ///
    /// Inline headers and DRM fields override anything accumulated earlier.
    pub fn finish(mut self, inline: InlineParams) -> ParsedChannel {
        for (name, value) in inline.headers {
            self.set_header(&name, value);
        }
        self.drm.merge(inline.drm);

        ParsedChannel {
            name: self.name,
            logo_url: self.logo,
            group_title: self.group,
            tvg_id: self.tvg_id,
            stream_url: inline.url,
            user_agent: self.user_agent,
            headers: self.headers,
            drm: self.drm,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestor::inline_params::parse_inline_params;

    #[test]
    fn test_inline_values_override_directives() {
        let mut state = EntryState {
            name: "News".to_string(),
            ..EntryState::default()
        };
        state.set_header("Referer", "https://directive.example/");
        state.set_header("Origin", "https://origin.example");
        state.set_header("user-agent", "DirectiveUA");
        state.drm.scheme = Some("widevine".to_string());

        let channel = state.finish(parse_inline_params(
            "http://example.com/news.m3u8|Referer=https://inline.example/|User-Agent=InlineUA|drmScheme=clearkey",
        ));

        assert_eq!(channel.stream_url, "http://example.com/news.m3u8");
        assert_eq!(channel.user_agent.as_deref(), Some("InlineUA"));
        assert_eq!(channel.headers.get("Referer"), Some("https://inline.example/"));
        assert_eq!(channel.headers.get("Origin"), Some("https://origin.example"));
        assert!(!channel.headers.contains("User-Agent"));
        assert_eq!(channel.drm.scheme.as_deref(), Some("clearkey"));
    }
}
