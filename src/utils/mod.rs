//! Utility modules shared across ingestion, descriptors and DRM handling

pub mod channel_id;
pub mod decompression;
pub mod url;

pub use channel_id::{IdStrategy, generate_channel_id, generate_fallback_channel_id, generate_id};
pub use decompression::{CompressionFormat, DecompressionService};
pub use url::UrlUtils;
