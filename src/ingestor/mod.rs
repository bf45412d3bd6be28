//! Playlist ingestion
//!
//! [`PlaylistIngestor`] turns a source (URL, JSON text or raw M3U text) into
//! [`ParsedChannel`]s and then into catalog [`ChannelEntry`]s. Loading never
//! fails: fetch and parse problems end up in [`ParseReport::issues`].

pub(crate) mod entry_state;
pub mod inline_params;
pub mod json_parser;
pub mod m3u_parser;

pub use inline_params::{InlineParams, parse_inline_params};
pub use json_parser::JsonPlaylistParser;
pub use m3u_parser::M3uParser;

use tracing::{info, warn};

use crate::config::CatalogConfig;
use crate::errors::ParseIssue;
use crate::models::{ChannelEntry, ParseReport, ParsedChannel, PlaylistFormat};
use crate::sources::PlaylistFetcher;
use crate::utils::{UrlUtils, generate_id};

pub struct PlaylistIngestor<F: PlaylistFetcher> {
    fetcher: F,
    catalog: CatalogConfig,
    m3u_parser: M3uParser,
    json_parser: JsonPlaylistParser,
}

impl<F: PlaylistFetcher> PlaylistIngestor<F> {
    pub fn new(fetcher: F, catalog: CatalogConfig) -> Self {
        let m3u_parser = M3uParser::new(catalog.default_channel_name.clone());
        let json_parser = JsonPlaylistParser::new(catalog.default_channel_name.clone());
        Self {
            fetcher,
            catalog,
            m3u_parser,
            json_parser,
        }
    }

    /// Load channels from `source`.
    ///
    /// Text that opens with `[` or `{` is parsed as JSON directly. An
    /// http(s) URL is fetched and the body is dispatched on its content, not
    /// on the URL's extension. Anything else is treated as playlist text.
    pub async fn load(&self, source: &str) -> ParseReport {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            warn!("Empty playlist source");
            return ParseReport::failed(ParseIssue::EmptyInput);
        }

        if PlaylistFormat::detect(trimmed) == PlaylistFormat::Json {
            return self.json_parser.parse(trimmed);
        }

        if UrlUtils::is_http_url(trimmed) {
            let safe_url = UrlUtils::obfuscate_credentials(trimmed);
            info!("Loading playlist from {}", safe_url);
            return match self.fetcher.fetch_text(trimmed).await {
                Ok(body) => self.parse_content(&body),
                Err(e) => {
                    warn!("Failed to fetch playlist from {}: {}", safe_url, e);
                    ParseReport::failed(e.into())
                }
            };
        }

        self.parse_content(source)
    }

    /// Parse playlist text, choosing the parser by content.
    pub fn parse_content(&self, content: &str) -> ParseReport {
        match PlaylistFormat::detect(content) {
            PlaylistFormat::Json => self.json_parser.parse(content),
            PlaylistFormat::M3u => self.m3u_parser.parse(content),
        }
    }

    /// Convert parsed channels into catalog entries for one category.
    pub fn convert_to_entries(
        &self,
        channels: &[ParsedChannel],
        category_id: &str,
        category_name: &str,
    ) -> Vec<ChannelEntry> {
        channels
            .iter()
            .map(|channel| ChannelEntry {
                id: generate_id(self.catalog.id_strategy, &channel.stream_url, &channel.name),
                name: channel.name.clone(),
                logo_url: if channel.logo_url.trim().is_empty() {
                    self.catalog.placeholder_logo(&channel.name)
                } else {
                    channel.logo_url.clone()
                },
                group_title: channel.group_title.clone(),
                descriptor: channel.to_descriptor(),
                category_id: category_id.to_string(),
                category_name: category_name.to_string(),
            })
            .collect()
    }

    /// Load `source` and convert the result in one step.
    pub async fn ingest(&self, source: &str, category_id: &str, category_name: &str) -> Vec<ChannelEntry> {
        let report = self.load(source).await;
        let entries = self.convert_to_entries(&report.channels, category_id, category_name);
        info!(
            "Ingested {} channels into category '{}' ({} issues)",
            entries.len(),
            category_name,
            report.issues.len()
        );
        entries
    }
}
