/// Archive data provider abstraction
///
/// A provider knows how to search an archive for video items and how to turn an item
/// identifier into playable file URLs. Providers report failures as errors; deciding what
/// a failure means for the feed is left to the fetcher.
use crate::{error::AppResult, models::RawItem};

pub mod internet_archive;

pub use internet_archive::InternetArchiveProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArchiveProvider: Send + Sync {
    /// Search for movie items matching an archive query
    ///
    /// Results are ordered by descending popularity, at most `rows` of them.
    async fn search(&self, query: &str, rows: usize) -> AppResult<Vec<RawItem>>;

    /// Resolve the playable video file URLs of an item, smallest file first
    async fn video_urls(&self, identifier: &str) -> AppResult<Vec<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
