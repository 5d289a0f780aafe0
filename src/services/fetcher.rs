use std::sync::Arc;

use rand::Rng;

use crate::{
    models::{RawItem, Suit, Video},
    services::{
        catalog::{Collection, CATALOG},
        classifier::classify_with_threshold,
        providers::ArchiveProvider,
    },
};

/// Items requested from a single collection by `random_video`
const RANDOM_SAMPLE_ROWS: usize = 10;

/// Turns archive search results into classified, playable feed videos
///
/// This is the failure boundary for archive access: provider errors are logged here and
/// become empty results, so callers only ever see fewer videos, never an error.
pub struct ArchiveFetcher {
    provider: Arc<dyn ArchiveProvider>,
    catalog: Vec<Collection>,
    min_keyword_matches: usize,
}

impl ArchiveFetcher {
    pub fn new(provider: Arc<dyn ArchiveProvider>, min_keyword_matches: usize) -> Self {
        Self::with_catalog(provider, CATALOG.to_vec(), min_keyword_matches)
    }

    pub fn with_catalog(
        provider: Arc<dyn ArchiveProvider>,
        catalog: Vec<Collection>,
        min_keyword_matches: usize,
    ) -> Self {
        Self {
            provider,
            catalog,
            min_keyword_matches,
        }
    }

    /// Searches the archive, returning no items if the search fails
    pub async fn search(&self, query: &str, limit: usize) -> Vec<RawItem> {
        match self.provider.search(query, limit).await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    query = %query,
                    provider = self.provider.name(),
                    "Archive search failed"
                );
                Vec::new()
            }
        }
    }

    /// Resolves an item's video URLs, smallest first, returning none if resolution fails
    pub async fn resolve_video_urls(&self, identifier: &str) -> Vec<String> {
        match self.provider.video_urls(identifier).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    identifier = %identifier,
                    provider = self.provider.name(),
                    "Failed to resolve video files"
                );
                Vec::new()
            }
        }
    }

    /// Seeds a feed with roughly `count` videos spread across the catalog
    ///
    /// Each collection is asked for `ceil(count / catalog size)` items. Collections and their
    /// items are processed in order, one request at a time, so the result is the
    /// concatenation of each collection's playable items in search order.
    pub async fn fetch_bootstrap(&self, count: usize) -> Vec<Video> {
        if count == 0 || self.catalog.is_empty() {
            return Vec::new();
        }

        let per_collection = count.div_ceil(self.catalog.len());
        let mut videos = Vec::new();

        for collection in &self.catalog {
            let items = self.search(collection.query, per_collection).await;
            let found = items.len();
            let before = videos.len();

            for item in items {
                if let Some(video) = self.playable_video(item, collection.default_suit).await {
                    videos.push(video);
                }
            }

            tracing::debug!(
                collection = collection.name,
                found,
                playable = videos.len() - before,
                "Collection fetched"
            );
        }

        tracing::info!(
            requested = count,
            per_collection,
            videos = videos.len(),
            "Bootstrap fetch completed"
        );

        videos
    }

    /// Picks one playable video from a random collection
    pub async fn random_video(&self) -> Option<Video> {
        if self.catalog.is_empty() {
            return None;
        }
        let collection = self.catalog[rand::thread_rng().gen_range(0..self.catalog.len())];

        let mut items = self.search(collection.query, RANDOM_SAMPLE_ROWS).await;
        if items.is_empty() {
            return None;
        }
        let item = items.swap_remove(rand::thread_rng().gen_range(0..items.len()));

        self.playable_video(item, collection.default_suit).await
    }

    /// Classifies an item and attaches its first video URL, if it has any
    async fn playable_video(&self, item: RawItem, default_suit: Suit) -> Option<Video> {
        let url = self
            .resolve_video_urls(&item.identifier)
            .await
            .into_iter()
            .next()?;
        let suit = classify_with_threshold(&item, default_suit, self.min_keyword_matches);
        Some(Video::from_archive(item, url, suit))
    }
}
