use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::error::AppResult;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Process-local store, used in tests and when running without Redis
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.read().await;
        let now = Instant::now();
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        // Expired entries are only ever overwritten or skipped, so sweep them on write
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: ttl_secs.map(|ttl| now + Duration::from_secs(ttl)),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = InMemoryStore::new();
        assert_ok!(store.set("k", "v", None).await);
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        assert_ok!(store.set("k", "w", None).await);
        assert_eq!(store.get("k").await.unwrap(), Some("w".to_string()));
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let store = InMemoryStore::new();
        assert_ok!(store.set("k", "v", Some(0)).await);
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_long_ttl_is_readable() {
        let store = InMemoryStore::new();
        assert_ok!(store.set("k", "v", Some(3600)).await);
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
    }
}
