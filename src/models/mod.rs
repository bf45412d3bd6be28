//! Channel records produced by the playlist parsers

use serde::Serialize;
use strum::Display;

use crate::errors::ParseIssue;

pub mod headers;

pub use headers::{DrmParams, HttpHeaders, capitalize_header_name};

/// Wire format of a playlist body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlaylistFormat {
    M3u,
    Json,
}

impl PlaylistFormat {
    /// Detect the format from the first significant character.
    ///
    /// A body opening with `[` or `{` is JSON whatever URL it came from;
    /// everything else is treated as extended M3U.
    pub fn detect(content: &str) -> Self {
        let trimmed = content.trim_start_matches('\u{feff}').trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            PlaylistFormat::Json
        } else {
            PlaylistFormat::M3u
        }
    }
}

/// One playable entry of a playlist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedChannel {
    pub name: String,
    pub logo_url: String,
    pub group_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvg_id: Option<String>,
    /// Bare media URL, inline `|key=value` parameters already stripped
    pub stream_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request headers other than `User-Agent`
    pub headers: HttpHeaders,
    #[serde(skip_serializing_if = "DrmParams::is_empty")]
    pub drm: DrmParams,
}

impl ParsedChannel {
    /// Effective request headers: `User-Agent` first, then the rest in order.
    pub fn request_headers(&self) -> HttpHeaders {
        let mut headers = HttpHeaders::new();
        if let Some(user_agent) = &self.user_agent {
            headers.insert(headers::USER_AGENT, user_agent.clone());
        }
        for (name, value) in self.headers.iter() {
            headers.insert(name, value);
        }
        headers
    }

    /// Encode this channel as a persisted descriptor string.
    pub fn to_descriptor(&self) -> String {
        crate::descriptor::encode_descriptor(self)
    }
}

/// A parsed channel converted for the catalog: stable id plus descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelEntry {
    pub id: String,
    pub name: String,
    pub logo_url: String,
    pub group_title: String,
    pub descriptor: String,
    pub category_id: String,
    pub category_name: String,
}

/// Outcome of loading one playlist
///
/// Parsing never fails as a whole; anything skipped along the way is listed
/// in `issues`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub format: Option<PlaylistFormat>,
    pub channels: Vec<ParsedChannel>,
    pub issues: Vec<ParseIssue>,
}

impl ParseReport {
    pub fn new(format: PlaylistFormat) -> Self {
        Self {
            format: Some(format),
            ..Self::default()
        }
    }

    /// A report with no channels and a single issue
    pub fn failed(issue: ParseIssue) -> Self {
        Self {
            format: None,
            channels: Vec::new(),
            issues: vec![issue],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}
