//! DRM scheme handling for decoded channels
//!
//! A channel carries its DRM data as two plain strings (scheme and license).
//! At playback time [`resolve_drm_session`] turns them into something a player
//! can act on: either a ready-made ClearKey license document, or a license
//! server URL for the player's own DRM session manager.

use serde::Serialize;
use strum::{Display, EnumString};
use tracing::debug;

pub mod clearkey;
pub mod codec;

pub use clearkey::{ClearKeyPair, build_clearkey_license, parse_key_pairs};

use crate::errors::{DrmError, DrmResult};
use crate::models::DrmParams;
use crate::utils::url::UrlUtils;

/// Supported content protection systems
///
/// Parsing is case-insensitive and also accepts the reverse-DNS key system
/// names Kodi playlists use (`com.widevine.alpha`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DrmScheme {
    #[strum(to_string = "clearkey", serialize = "org.w3.clearkey")]
    ClearKey,
    #[strum(to_string = "widevine", serialize = "com.widevine.alpha")]
    Widevine,
    #[strum(to_string = "playready", serialize = "com.microsoft.playready")]
    PlayReady,
}

/// What a player needs to start a protected stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrmSession {
    /// Static keys, already converted into a ClearKey license document
    ClearKey { license_json: String },
    /// Keys are fetched by the player from a license server
    LicenseServer { scheme: DrmScheme, url: String },
}

/// Resolve a channel's DRM parameters into a playable session.
///
/// Returns `Ok(None)` for unprotected channels. An error means the channel
/// is DRM-unusable; it never affects any other channel.
pub fn resolve_drm_session(drm: &DrmParams) -> DrmResult<Option<DrmSession>> {
    let Some(scheme) = drm.scheme_kind() else {
        return Ok(None);
    };
    let scheme = scheme?;

    let license = drm
        .license
        .as_deref()
        .map(str::trim)
        .filter(|license| !license.is_empty());

    match (scheme, license) {
        (_, Some(url)) if UrlUtils::is_http_url(url) => {
            debug!(
                "Using {} license server {}",
                scheme,
                UrlUtils::obfuscate_credentials(url)
            );
            Ok(Some(DrmSession::LicenseServer {
                scheme,
                url: url.to_string(),
            }))
        }
        (DrmScheme::ClearKey, Some(material)) => Ok(Some(DrmSession::ClearKey {
            license_json: build_clearkey_license(material)?,
        })),
        (DrmScheme::ClearKey, None) => Err(DrmError::MissingKeyMaterial {
            scheme: scheme.to_string(),
        }),
        (DrmScheme::Widevine | DrmScheme::PlayReady, _) => Err(DrmError::MissingLicenseUrl {
            scheme: scheme.to_string(),
        }),
    }
}
