//! Centralized error handling for playlist ingestion
//!
//! Errors are layered the same way the ingestion flow is:
//!
//! - **Source Errors**: fetching playlists over HTTP (timeouts, status codes, decoding)
//! - **DRM Errors**: converting key material and resolving license sessions
//! - **Parse Issues**: non-fatal, per-entry problems collected while parsing
//! - **App Errors**: the top-level union used by configuration and the binary
//!
//! Parsing never fails as a whole. Everything that goes wrong inside a playlist
//! is reported as a [`ParseIssue`] next to the channels that did parse.
//!
//! # Usage
//!
//! ```rust
//! use m3u_channels::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("fetch.connect_timeout must be non-zero"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for DRM Results
pub type DrmResult<T> = Result<T, DrmError>;
