use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use super::entry_state::EntryState;
use super::inline_params::{ParamKey, classify_key, parse_inline_params};
use crate::errors::ParseIssue;
use crate::models::headers::{ORIGIN, REFERER, USER_AGENT};
use crate::models::{ParseReport, ParsedChannel, PlaylistFormat, capitalize_header_name};
use crate::utils::url::UrlUtils;

const EXTM3U: &str = "#EXTM3U";
const EXTINF: &str = "#EXTINF:";
const EXTHTTP: &str = "#EXTHTTP:";
const VLC_USER_AGENT: &str = "#EXTVLCOPT:http-user-agent=";
const VLC_ORIGIN: &str = "#EXTVLCOPT:http-origin=";
const VLC_REFERRER: &str = "#EXTVLCOPT:http-referrer=";
const VLC_REFERER: &str = "#EXTVLCOPT:http-referer=";
const KODI_LICENSE_TYPE: &str = "#KODIPROP:inputstream.adaptive.license_type=";
const KODI_LICENSE_KEY: &str = "#KODIPROP:inputstream.adaptive.license_key=";

static ATTRIBUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z0-9_-]+)="([^"]*)""#).expect("attribute regex is valid")
});

/// Line-oriented parser for extended M3U playlists
///
/// Directives before a stream URL accumulate into one entry; the URL line
/// emits the channel and starts a fresh entry. Problems with a single line
/// are recorded in the report and never abort the playlist.
#[derive(Debug, Clone)]
pub struct M3uParser {
    default_channel_name: String,
}

impl M3uParser {
    pub fn new(default_channel_name: impl Into<String>) -> Self {
        Self {
            default_channel_name: default_channel_name.into(),
        }
    }

    pub fn parse(&self, content: &str) -> ParseReport {
        let mut report = ParseReport::new(PlaylistFormat::M3u);
        let content = content.trim_start_matches('\u{feff}');

        if content.trim().is_empty() {
            warn!("M3U playlist is empty");
            report.issues.push(ParseIssue::EmptyInput);
            return report;
        }

        let first_line = content.lines().map(str::trim).find(|line| !line.is_empty());
        if !first_line.is_some_and(|line| line.starts_with(EXTM3U)) {
            debug!("M3U playlist has no {} header, parsing leniently", EXTM3U);
            report.issues.push(ParseIssue::MissingHeader);
        }

        let mut state = EntryState::default();
        for (index, raw_line) in content.lines().enumerate() {
            let line_number = index + 1;
            match self.process_line(raw_line.trim(), line_number, &mut state) {
                Ok(Some(channel)) => report.channels.push(channel),
                Ok(None) => {}
                Err(issue) => {
                    warn!("{}", issue);
                    report.issues.push(issue);
                }
            }
        }

        info!(
            "M3U parsing completed: {} channels parsed, {} issues",
            report.channels.len(),
            report.issues.len()
        );
        report
    }

    /// Apply one trimmed line to the current entry.
    ///
    /// Returns the finished channel when `line` is a stream URL.
    fn process_line(
        &self,
        line: &str,
        line_number: usize,
        state: &mut EntryState,
    ) -> Result<Option<ParsedChannel>, ParseIssue> {
        if line.is_empty() || line.starts_with(EXTM3U) {
            return Ok(None);
        }

        if let Some(body) = line.strip_prefix(EXTINF) {
            self.apply_extinf(body, state);
        } else if let Some(value) = line.strip_prefix(VLC_USER_AGENT) {
            if let Some(value) = non_empty(value) {
                state.set_header(USER_AGENT, value);
            }
        } else if let Some(value) = line.strip_prefix(VLC_ORIGIN) {
            if let Some(value) = non_empty(value) {
                state.set_header(ORIGIN, value);
            }
        } else if let Some(value) = line
            .strip_prefix(VLC_REFERRER)
            .or_else(|| line.strip_prefix(VLC_REFERER))
        {
            if let Some(value) = non_empty(value) {
                state.set_header(REFERER, value);
            }
        } else if let Some(payload) = line.strip_prefix(EXTHTTP) {
            apply_http_directive(payload, line_number, state)?;
        } else if let Some(value) = line.strip_prefix(KODI_LICENSE_TYPE) {
            if let Some(value) = non_empty(value) {
                state.drm.scheme = Some(value);
            }
        } else if let Some(value) = line.strip_prefix(KODI_LICENSE_KEY) {
            if let Some(value) = non_empty(value) {
                state.drm.license = Some(value);
            }
        } else if !line.starts_with('#') {
            return self.finish_entry(line, line_number, state);
        }

        Ok(None)
    }

    fn apply_extinf(&self, body: &str, state: &mut EntryState) {
        let (attributes, title) = split_extinf(body);

        state.name = title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(&self.default_channel_name)
            .to_string();

        for captures in ATTRIBUTE_REGEX.captures_iter(attributes) {
            let value = captures[2].to_string();
            match &captures[1] {
                "tvg-logo" => state.logo = value,
                "group-title" => state.group = value,
                "tvg-id" => state.tvg_id = Some(value),
                _ => {}
            }
        }
    }

    fn finish_entry(
        &self,
        line: &str,
        line_number: usize,
        state: &mut EntryState,
    ) -> Result<Option<ParsedChannel>, ParseIssue> {
        let entry = std::mem::take(state);
        if entry.name.is_empty() {
            return Err(ParseIssue::OrphanUrl { line: line_number });
        }

        let inline = parse_inline_params(line);
        if inline.url.is_empty() {
            return Err(ParseIssue::EmptyStreamUrl { line: line_number });
        }

        let channel = entry.finish(inline);
        debug!(
            "Parsed channel '{}' -> {}",
            channel.name,
            UrlUtils::obfuscate_credentials(&channel.stream_url)
        );
        Ok(Some(channel))
    }
}

/// Split an `#EXTINF:` body into its attribute part and title.
///
/// The title starts after the first comma outside a quoted attribute value.
/// With unbalanced quotes the last comma is used instead.
fn split_extinf(body: &str) -> (&str, Option<&str>) {
    let mut in_quotes = false;
    for (index, ch) in body.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return (&body[..index], Some(&body[index + 1..])),
            _ => {}
        }
    }

    match body.rfind(',') {
        Some(index) if in_quotes => (&body[..index], Some(&body[index + 1..])),
        _ => (body, None),
    }
}

/// Merge a `#EXTHTTP:{...}` JSON object into the entry.
///
/// The payload is fully parsed before anything is applied, so a malformed
/// directive leaves the entry untouched. Keys go through the same synonym
/// table as inline parameters and string values are trimmed; members are
/// applied in document order.
fn apply_http_directive(
    payload: &str,
    line_number: usize,
    state: &mut EntryState,
) -> Result<(), ParseIssue> {
    let map = match serde_json::from_str::<Value>(payload.trim()) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            return Err(ParseIssue::MalformedHttpDirective {
                line: line_number,
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            });
        }
        Err(e) => {
            return Err(ParseIssue::MalformedHttpDirective {
                line: line_number,
                message: e.to_string(),
            });
        }
    };

    for (key, value) in map {
        let key = key.trim();
        if key.is_empty() || key.contains(['=', '|']) {
            debug!("Line {}: ignoring #EXTHTTP key {:?}", line_number, key);
            continue;
        }
        let value = match value {
            Value::String(text) => text.trim().to_string(),
            other => other.to_string(),
        };
        match classify_key(key) {
            ParamKey::Header(name) => state.set_header(name, value),
            ParamKey::DrmScheme => state.drm.scheme = Some(value),
            ParamKey::DrmLicense => state.drm.license = Some(value),
            ParamKey::Custom => state.set_header(&capitalize_header_name(key), value),
        }
    }
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
