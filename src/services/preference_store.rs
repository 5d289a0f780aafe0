use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    db::KeyValueStore,
    error::AppResult,
    models::{Preferences, SuitWeights},
};

/// Loads and persists the preferences blob through an injected key-value backend
///
/// Every mutation is a load-modify-save under an in-process lock, so concurrent requests in
/// one process never lose each other's updates. Separate processes sharing a backend get
/// last-writer-wins.
pub struct PreferenceStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
    watched_limit: usize,
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, key: impl Into<String>, watched_limit: usize) -> Self {
        Self {
            backend,
            key: key.into(),
            watched_limit,
            write_lock: Mutex::new(()),
        }
    }

    /// Current preferences, or defaults when nothing usable is stored
    ///
    /// Never fails: an unreachable backend or a corrupt blob is logged and replaced by
    /// defaults.
    pub async fn load(&self) -> Preferences {
        let stored = match self.backend.get(&self.key).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "Preference storage unavailable, using defaults");
                return Preferences::default();
            }
        };

        let Some(json) = stored else {
            return Preferences::default();
        };

        match serde_json::from_str::<Preferences>(&json) {
            Ok(prefs) => prefs.normalized(self.watched_limit),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "Discarding malformed preferences");
                Preferences::default()
            }
        }
    }

    pub async fn save(&self, prefs: &Preferences) -> AppResult<()> {
        let json = serde_json::to_string(prefs)?;
        self.backend.set(&self.key, &json, None).await
    }

    /// Records a view. Returns whether the id was newly added.
    pub async fn mark_watched(&self, video_id: &str) -> AppResult<bool> {
        let limit = self.watched_limit;
        self.update(|prefs| {
            let added = prefs.mark_watched(video_id, limit);
            (added, added)
        })
        .await
    }

    /// Flips the like state and returns whether the video is now liked
    pub async fn toggle_like(&self, video_id: &str) -> AppResult<bool> {
        self.update(|prefs| (true, prefs.toggle_like(video_id))).await
    }

    pub async fn is_liked(&self, video_id: &str) -> bool {
        self.load().await.is_liked(video_id)
    }

    /// Blocks a video. Returns whether it was newly blocked.
    pub async fn block(&self, video_id: &str) -> AppResult<bool> {
        self.update(|prefs| {
            let added = prefs.block(video_id);
            (added, added)
        })
        .await
    }

    pub async fn set_suit_weights(&self, weights: SuitWeights) -> AppResult<Preferences> {
        weights.validate()?;
        self.update(|prefs| {
            prefs.suits = weights;
            (true, prefs.clone())
        })
        .await
    }

    pub async fn set_surprise_me(&self, surprise_me: bool) -> AppResult<Preferences> {
        self.update(|prefs| {
            prefs.surprise_me = surprise_me;
            (true, prefs.clone())
        })
        .await
    }

    /// Applies `mutate` to freshly loaded preferences, saving when it reports a change
    async fn update<T, F>(&self, mutate: F) -> AppResult<T>
    where
        F: FnOnce(&mut Preferences) -> (bool, T),
    {
        let _guard = self.write_lock.lock().await;
        let mut prefs = self.load().await;
        let (changed, result) = mutate(&mut prefs);
        if changed {
            self.save(&prefs).await?;
        }
        Ok(result)
    }
}
