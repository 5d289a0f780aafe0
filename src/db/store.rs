use crate::error::AppResult;

/// String key-value backend used for preferences and cached archive responses
///
/// Implementations must be cheap to share behind an `Arc`; all methods take `&self`.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` if the key is absent or expired
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Stores a value, optionally expiring after `ttl_secs`
    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> AppResult<()>;
}
