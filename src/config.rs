use serde::Deserialize;

use crate::services::classifier::DEFAULT_MIN_KEYWORD_MATCHES;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL (preferences and response cache)
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Archive advanced search endpoint
    #[serde(default = "default_archive_search_url")]
    pub archive_search_url: String,

    /// Archive item metadata endpoint
    #[serde(default = "default_archive_metadata_url")]
    pub archive_metadata_url: String,

    /// Archive file download base URL
    #[serde(default = "default_archive_download_url")]
    pub archive_download_url: String,

    /// Storage key holding the serialized preferences blob
    #[serde(default = "default_preferences_key")]
    pub preferences_key: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of videos requested by a bootstrap fetch when the caller doesn't say
    #[serde(default = "default_bootstrap_count")]
    pub bootstrap_count: usize,

    /// Keyword matches needed before the classifier overrides a collection's suit
    #[serde(default = "default_min_keyword_matches")]
    pub min_keyword_matches: usize,

    /// Score bonus for liked videos
    #[serde(default = "default_liked_bonus")]
    pub liked_bonus: f64,

    /// Upper bound of the random jitter added when surprise mode is on
    #[serde(default = "default_surprise_factor")]
    pub surprise_factor: f64,

    /// Maximum length of the watch history
    #[serde(default = "default_watched_limit")]
    pub watched_limit: usize,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_archive_search_url() -> String {
    "https://archive.org/advancedsearch.php".to_string()
}

fn default_archive_metadata_url() -> String {
    "https://archive.org/metadata".to_string()
}

fn default_archive_download_url() -> String {
    "https://archive.org/download".to_string()
}

fn default_preferences_key() -> String {
    "dtiktok_preferences".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_bootstrap_count() -> usize {
    50
}

fn default_min_keyword_matches() -> usize {
    FeedTuning::default().min_keyword_matches
}

fn default_liked_bonus() -> f64 {
    FeedTuning::default().liked_bonus
}

fn default_surprise_factor() -> f64 {
    FeedTuning::default().surprise_factor
}

fn default_watched_limit() -> usize {
    FeedTuning::default().watched_limit
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Ranking and classification knobs derived from this config
    pub fn tuning(&self) -> FeedTuning {
        FeedTuning {
            min_keyword_matches: self.min_keyword_matches,
            liked_bonus: self.liked_bonus,
            surprise_factor: self.surprise_factor,
            watched_limit: self.watched_limit,
        }
    }
}

/// Tuning constants shared by the classifier, the feed router and the preference store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedTuning {
    pub min_keyword_matches: usize,
    pub liked_bonus: f64,
    pub surprise_factor: f64,
    pub watched_limit: usize,
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            min_keyword_matches: DEFAULT_MIN_KEYWORD_MATCHES,
            liked_bonus: 0.2,
            surprise_factor: 0.3,
            watched_limit: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_empty_env() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.preferences_key, "dtiktok_preferences");
        assert_eq!(config.archive_metadata_url, "https://archive.org/metadata");
        assert_eq!(config.tuning(), FeedTuning::default());
    }

    #[test]
    fn test_config_overrides_tuning() {
        let vars = vec![
            ("LIKED_BONUS".to_string(), "0.5".to_string()),
            ("WATCHED_LIMIT".to_string(), "10".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        let tuning = config.tuning();
        assert_eq!(tuning.liked_bonus, 0.5);
        assert_eq!(tuning.watched_limit, 10);
        assert_eq!(tuning.surprise_factor, 0.3);
    }
}
