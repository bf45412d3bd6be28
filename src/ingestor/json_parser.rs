//! JSON array playlists
//!
//! Some providers publish `[{"name": ..., "link": ...}, ...]` instead of M3U.
//! Each element is decoded on its own so one bad object only costs that
//! channel.

use serde::{Deserialize, Deserializer, de};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::entry_state::EntryState;
use super::inline_params::parse_inline_params;
use crate::errors::ParseIssue;
use crate::models::headers::{COOKIE, ORIGIN, REFERER};
use crate::models::{ParseReport, ParsedChannel, PlaylistFormat};
use crate::utils::url::UrlUtils;

#[derive(Debug, Deserialize)]
struct JsonPlaylistEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    group: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    cookie: Option<String>,
    #[serde(rename = "user-agent", default, deserialize_with = "lenient_string")]
    user_agent: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    referer: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    origin: Option<String>,
    #[serde(rename = "drmScheme", default, deserialize_with = "lenient_string")]
    drm_scheme: Option<String>,
    #[serde(rename = "drmLicense", default, deserialize_with = "lenient_string")]
    drm_license: Option<String>,
}

/// Accept any JSON scalar where a string is expected: `42` becomes `"42"`,
/// `null` becomes `None`. Arrays and objects are rejected.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text)),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        Value::Number(number) => Ok(Some(number.to_string())),
        other => Err(de::Error::invalid_type(
            de::Unexpected::Other(if other.is_array() { "array" } else { "object" }),
            &"a string",
        )),
    }
}

/// Trimmed value, or `None` when blank
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
pub struct JsonPlaylistParser {
    default_channel_name: String,
}

impl JsonPlaylistParser {
    pub fn new(default_channel_name: impl Into<String>) -> Self {
        Self {
            default_channel_name: default_channel_name.into(),
        }
    }

    pub fn parse(&self, content: &str) -> ParseReport {
        let content = content.trim_start_matches('\u{feff}');
        let elements = match serde_json::from_str::<Vec<Value>>(content) {
            Ok(elements) => elements,
            Err(e) => {
                let issue = ParseIssue::InvalidJson {
                    message: e.to_string(),
                };
                warn!("{}", issue);
                let mut report = ParseReport::new(PlaylistFormat::Json);
                report.issues.push(issue);
                return report;
            }
        };

        let mut report = ParseReport::new(PlaylistFormat::Json);
        for (index, element) in elements.into_iter().enumerate() {
            match self.parse_entry(index, element) {
                Ok(channel) => report.channels.push(channel),
                Err(issue) => {
                    warn!("{}", issue);
                    report.issues.push(issue);
                }
            }
        }

        info!(
            "JSON playlist parsing completed: {} channels parsed, {} issues",
            report.channels.len(),
            report.issues.len()
        );
        report
    }

    fn parse_entry(&self, index: usize, element: Value) -> Result<ParsedChannel, ParseIssue> {
        let entry: JsonPlaylistEntry =
            serde_json::from_value(element).map_err(|e| ParseIssue::MalformedJsonEntry {
                index,
                message: e.to_string(),
            })?;

        let link = entry
            .link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
            .ok_or(ParseIssue::MissingLink { index })?;
        let inline = parse_inline_params(link);
        if inline.url.is_empty() {
            return Err(ParseIssue::MissingLink { index });
        }

        let mut state = EntryState {
            name: trimmed(entry.name).unwrap_or_else(|| self.default_channel_name.clone()),
            logo: trimmed(entry.logo).unwrap_or_default(),
            group: trimmed(entry.group).unwrap_or_default(),
            user_agent: trimmed(entry.user_agent),
            ..EntryState::default()
        };

        for (header, value) in [
            (COOKIE, entry.cookie),
            (REFERER, entry.referer),
            (ORIGIN, entry.origin),
        ] {
            if let Some(value) = trimmed(value) {
                state.headers.insert(header, value);
            }
        }
        state.drm.scheme = trimmed(entry.drm_scheme);
        state.drm.license = trimmed(entry.drm_license);

        let channel = state.finish(inline);
        debug!(
            "Parsed JSON channel '{}' -> {}",
            channel.name,
            UrlUtils::obfuscate_credentials(&channel.stream_url)
        );
        Ok(channel)
    }
}
