pub mod catalog;
pub mod classifier;
pub mod feed_router;
pub mod fetcher;
pub mod preference_store;
pub mod providers;

pub use fetcher::ArchiveFetcher;
pub use preference_store::PreferenceStore;
