//! reqwest-backed playlist fetcher

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::traits::PlaylistFetcher;
use crate::config::FetchConfig;
use crate::errors::{AppResult, SourceError, SourceResult};
use crate::utils::{CompressionFormat, DecompressionService, UrlUtils};

/// Fetches playlists over HTTP(S) with the configured timeouts and User-Agent
///
/// Redirects are followed. Compressed bodies are detected by magic bytes and
/// unpacked whatever the response headers claim.
#[derive(Debug, Clone)]
pub struct HttpPlaylistFetcher {
    client: Client,
}

impl HttpPlaylistFetcher {
    pub fn new(config: &FetchConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PlaylistFetcher for HttpPlaylistFetcher {
    async fn fetch_text(&self, url: &str) -> SourceResult<String> {
        let safe_url = UrlUtils::obfuscate_credentials(url);
        debug!("Fetching playlist from: {}", safe_url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(&e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                url: safe_url,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::from_reqwest(&e, url))?;
        let format = DecompressionService::detect_compression_format(&bytes);
        if format != CompressionFormat::Uncompressed {
            debug!("Detected {:?} compressed playlist from {}", format, safe_url);
        }
        let body = DecompressionService::decompress(bytes)?;

        let text = String::from_utf8(body)
            .map_err(|e| SourceError::decode(format!("Playlist body is not valid UTF-8: {e}")))?;
        info!("Fetched {} bytes from {}", text.len(), safe_url);
        Ok(text)
    }
}
