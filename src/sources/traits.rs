use async_trait::async_trait;

use crate::errors::SourceResult;

/// Retrieves playlist bodies for the ingestor
///
/// Implementations return the decompressed body as text. Every failure
/// (transport, status, timeout, encoding) is reported as a `SourceError`;
/// the ingestor turns it into a `FetchFailed` issue.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> SourceResult<String>;
}
