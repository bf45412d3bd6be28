//! Configuration default values
//!
//! All defaults live here so they can be changed in one place.

// Fetch defaults
pub const DEFAULT_CONNECT_TIMEOUT: &str = "15s";
pub const DEFAULT_READ_TIMEOUT: &str = "15s";
pub const DEFAULT_USER_AGENT: &str = concat!("m3u-channels/", env!("CARGO_PKG_VERSION"));

// Catalog defaults
pub const DEFAULT_CHANNEL_NAME: &str = "Unknown Channel";
pub const DEFAULT_PLACEHOLDER_LOGO_TEMPLATE: &str = "https://via.placeholder.com/150?text={initials}";
pub const INITIALS_PLACEHOLDER: &str = "{initials}";

// Environment overrides
pub const ENV_PREFIX: &str = "M3U_CHANNELS_";
pub const ENV_NESTING_SEPARATOR: &str = "__";
