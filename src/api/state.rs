use std::sync::Arc;

use crate::config::FeedTuning;
use crate::services::{ArchiveFetcher, PreferenceStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<ArchiveFetcher>,
    pub preferences: Arc<PreferenceStore>,
    pub tuning: FeedTuning,
    /// Feed size used when a request doesn't ask for one
    pub bootstrap_count: usize,
}

impl AppState {
    pub fn new(
        fetcher: ArchiveFetcher,
        preferences: PreferenceStore,
        tuning: FeedTuning,
        bootstrap_count: usize,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            preferences: Arc::new(preferences),
            tuning,
            bootstrap_count,
        }
    }
}
