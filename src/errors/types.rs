//! Error type definitions for playlist ingestion
//!
//! This module defines the hierarchical error types used throughout the crate.
//! Fatal errors (`AppError`, `SourceError`, `DrmError`) travel through `Result`s;
//! `ParseIssue` values are diagnostics that never abort a parse.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Playlist source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// DRM key material or session errors
    #[error("DRM error: {0}")]
    Drm(#[from] DrmError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Playlist fetching errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Connect or read timeout
    #[error("Connection timeout: {url}")]
    Timeout { url: String },

    /// Non-success HTTP status
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// Connection refused, DNS failure, TLS failure and friends
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Body could not be decompressed or decoded as text
    #[error("Decode error: {message}")]
    Decode { message: String },
}

/// DRM key material and session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrmError {
    /// A key or key id that is not valid hex (odd length or non-hex characters)
    #[error("Invalid hex in {field}: {message}")]
    InvalidHex { field: &'static str, message: String },

    /// A pair that does not have the `keyId:key` shape
    #[error("Malformed key pair: '{pair}'")]
    MalformedKeyPair { pair: String },

    /// ClearKey requested but no key material supplied
    #[error("No key material for {scheme}")]
    MissingKeyMaterial { scheme: String },

    /// License-server scheme without a license URL
    #[error("{scheme} requires a license server URL")]
    MissingLicenseUrl { scheme: String },

    /// Scheme name that is not ClearKey, Widevine or PlayReady
    #[error("Unsupported DRM scheme: {scheme}")]
    UnsupportedScheme { scheme: String },

    /// The license document could not be serialized
    #[error("Failed to encode license: {message}")]
    LicenseEncoding { message: String },
}

/// Non-fatal problems found while loading a playlist
///
/// Every variant describes a single entry, directive or fetch that was skipped
/// or left partially applied. The rest of the playlist is unaffected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// The playlist text was empty or whitespace only
    #[error("Playlist is empty")]
    EmptyInput,

    /// The first significant line was not `#EXTM3U`
    #[error("Missing #EXTM3U header, parsing leniently")]
    MissingHeader,

    /// A `#EXTHTTP` payload that is not a JSON object
    #[error("Line {line}: malformed #EXTHTTP payload: {message}")]
    MalformedHttpDirective { line: usize, message: String },

    /// A stream URL with no preceding `#EXTINF`
    #[error("Line {line}: stream URL without #EXTINF metadata dropped")]
    OrphanUrl { line: usize },

    /// A stream line whose URL part is empty (`|key=value` only)
    #[error("Line {line}: empty stream URL, entry dropped")]
    EmptyStreamUrl { line: usize },

    /// The JSON document could not be parsed as an array
    #[error("Invalid JSON playlist: {message}")]
    InvalidJson { message: String },

    /// A JSON array element that is not a well-formed channel object
    #[error("JSON entry {index}: {message}")]
    MalformedJsonEntry { index: usize, message: String },

    /// A JSON array element with an empty or missing `link`
    #[error("JSON entry {index}: missing link")]
    MissingLink { index: usize },

    /// The playlist could not be fetched
    #[error("Fetch failed: {message}")]
    FetchFailed { message: String },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Classify a reqwest failure, keeping credentials out of the message
    pub fn from_reqwest(error: &reqwest::Error, url: &str) -> Self {
        let safe_url = crate::utils::url::UrlUtils::obfuscate_credentials(url);
        if error.is_timeout() {
            return Self::Timeout { url: safe_url };
        }
        if let Some(status) = error.status() {
            return Self::Http {
                status: status.as_u16(),
                url: safe_url,
            };
        }
        Self::Transport {
            message: crate::utils::url::UrlUtils::obfuscate_credentials(&error.to_string()),
        }
    }

    /// Create a decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

impl From<SourceError> for ParseIssue {
    fn from(error: SourceError) -> Self {
        ParseIssue::FetchFailed {
            message: error.to_string(),
        }
    }
}
