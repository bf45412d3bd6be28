//! Per-channel HTTP request headers and DRM parameters
//!
//! Header names are matched case-insensitively but stored with the spelling
//! they were first given, and iteration follows insertion order. Values are
//! opaque: a `Cookie` such as `a=1; b=2` is one value and stays one value.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::str::FromStr;

use crate::drm::DrmScheme;
use crate::errors::DrmError;

pub const USER_AGENT: &str = "User-Agent";
pub const REFERER: &str = "Referer";
pub const ORIGIN: &str = "Origin";
pub const COOKIE: &str = "Cookie";

/// Ordered, case-insensitive header map
///
/// Keyed by the ASCII-lowercased name; each slot keeps the spelling the name
/// was first inserted with.
#[derive(Debug, Clone, Default)]
pub struct HttpHeaders {
    entries: IndexMap<String, (String, String)>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a header.
    ///
    /// Replacing keeps the header's original position and spelling and only
    /// swaps the value, so a later `referer` overrides an earlier `Referer`
    /// without reordering the map.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.entry(name.to_ascii_lowercase()) {
            Entry::Occupied(mut slot) => slot.get_mut().1 = value,
            Entry::Vacant(slot) => {
                slot.insert((name, value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries
            .shift_remove(&name.to_ascii_lowercase())
            .map(|(_, value)| value)
    }

    /// Overlay `other` on top of `self`; values from `other` win.
    pub fn merge(&mut self, other: HttpHeaders) {
        for (name, value) in other {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Equality is order-sensitive: same headers in the same order.
impl PartialEq for HttpHeaders {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for HttpHeaders {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HttpHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = HttpHeaders::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl IntoIterator for HttpHeaders {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoValues<String, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl Serialize for HttpHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// DRM activation data carried alongside a stream URL
///
/// Both fields are kept exactly as the playlist spelled them so that the
/// descriptor round-trips byte for byte; interpretation happens in
/// [`crate::drm::resolve_drm_session`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct DrmParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl DrmParams {
    pub fn is_empty(&self) -> bool {
        self.scheme.is_none() && self.license.is_none()
    }

    /// Overlay `other` on top of `self`, field by field.
    pub fn merge(&mut self, other: DrmParams) {
        if other.scheme.is_some() {
            self.scheme = other.scheme;
        }
        if other.license.is_some() {
            self.license = other.license;
        }
    }

    /// Classify the scheme string, if one is present.
    pub fn scheme_kind(&self) -> Option<Result<DrmScheme, DrmError>> {
        self.scheme.as_deref().map(|scheme| {
            DrmScheme::from_str(scheme.trim()).map_err(|_| DrmError::UnsupportedScheme {
                scheme: scheme.to_string(),
            })
        })
    }
}

/// Capitalize each hyphen-separated segment: `x-forwarded-for` -> `X-Forwarded-For`
pub fn capitalize_header_name(name: &str) -> String {
    name.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
