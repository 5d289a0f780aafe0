use std::fmt::Display;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::KeyValueStore;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Search results for a query at a given row count
    ArchiveSearch { query: String, rows: usize },
    /// Resolved video URLs for an archive identifier
    VideoFiles(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::ArchiveSearch { query, rows } => {
                write!(f, "archive:search:{}:{}", rows, query.to_lowercase())
            }
            // Identifiers are case-sensitive
            CacheKey::VideoFiles(identifier) => write!(f, "archive:files:{}", identifier),
        }
    }
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache for archive responses over any key-value backend
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and waits for it to stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task failed");
        }
    }
}

impl Cache {
    /// Creates a new Cache with a background writer task
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(store: Arc<dyn KeyValueStore>) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let writer_store = store.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(writer_store, write_rx, shutdown_rx).await;
        });

        let cache = Self { store, write_tx };
        let handle = CacheWriterHandle { shutdown_tx, task };

        (cache, handle)
    }

    /// Background task that drains cache write messages into the store
    ///
    /// On shutdown, writes whatever is already queued and exits.
    async fn cache_writer_task(
        store: Arc<dyn KeyValueStore>,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                maybe_msg = write_rx.recv() => {
                    match maybe_msg {
                        Some(msg) => Self::write(store.as_ref(), msg).await,
                        None => break,
                    }
                }
                // A dropped handle disables this branch; the writer then runs until every Cache is gone
                Some(()) = shutdown_rx.recv() => {
                    let mut flushed = 0;
                    while let Ok(msg) = write_rx.try_recv() {
                        Self::write(store.as_ref(), msg).await;
                        flushed += 1;
                    }
                    tracing::info!(flushed, "Cache writer flushed pending writes");
                    break;
                }
            }
        }

        tracing::info!("Cache writer task stopped");
    }

    async fn write(store: &dyn KeyValueStore, msg: CacheWriteMessage) {
        if let Err(e) = store.set(&msg.key, &msg.value, Some(msg.ttl)).await {
            tracing::error!(error = %e, key = %msg.key, "Failed to write cache entry");
        }
    }

    /// Retrieves and deserializes a cached value
    ///
    /// Backend and decoding failures are logged and reported as a miss; the cache is never
    /// a reason for a fetch to fail.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.lookup(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed, treating as miss");
                None
            }
        }
    }

    async fn lookup<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        match self.store.get(&key.to_string()).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Queues a value for writing without waiting for the backend
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;

    #[test]
    fn test_cache_key_display_search_lowercase() {
        let key = CacheKey::ArchiveSearch {
            query: "Collection:NASA".to_string(),
            rows: 4,
        };
        assert_eq!(format!("{}", key), "archive:search:4:collection:nasa");
    }

    #[test]
    fn test_cache_key_display_files_keeps_case() {
        let key = CacheKey::VideoFiles("Popeye_Nearlyweds".to_string());
        assert_eq!(format!("{}", key), "archive:files:Popeye_Nearlyweds");
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let (cache, _handle) = Cache::new(Arc::new(InMemoryStore::new()));
        let key = CacheKey::VideoFiles("nonexistent".to_string());
        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await;
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_set_in_background_writes_to_store() {
        let store = Arc::new(InMemoryStore::new());
        let (cache, handle) = Cache::new(store.clone());

        let key = CacheKey::VideoFiles("item".to_string());
        let value = vec!["https://archive.org/download/item/a.mp4".to_string()];
        cache.set_in_background(&key, &value, 60);

        handle.shutdown().await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await;
        assert_eq!(retrieved, Some(value));
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_a_miss() {
        let store = Arc::new(InMemoryStore::new());
        store
            .set("archive:files:broken", "not json", None)
            .await
            .unwrap();
        let (cache, _handle) = Cache::new(store);

        let key = CacheKey::VideoFiles("broken".to_string());
        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await;
        assert_eq!(retrieved, None);
    }
}
