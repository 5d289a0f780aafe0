use serde::{Deserialize, Serialize};

use super::Suit;
use crate::error::{AppError, AppResult};

/// Highest weight a suit can carry
pub const MAX_SUIT_WEIGHT: u8 = 5;

const DEFAULT_SUIT_WEIGHT: u8 = 3;

fn default_suit_weight() -> u8 {
    DEFAULT_SUIT_WEIGHT
}

fn default_surprise_me() -> bool {
    true
}

/// Per-suit preference weights, each in `0..=MAX_SUIT_WEIGHT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitWeights {
    #[serde(default = "default_suit_weight")]
    pub hearts: u8,
    #[serde(default = "default_suit_weight")]
    pub spades: u8,
    #[serde(default = "default_suit_weight")]
    pub diamonds: u8,
    #[serde(default = "default_suit_weight")]
    pub clubs: u8,
}

impl Default for SuitWeights {
    fn default() -> Self {
        Self::uniform(DEFAULT_SUIT_WEIGHT)
    }
}

impl SuitWeights {
    pub fn uniform(weight: u8) -> Self {
        Self {
            hearts: weight,
            spades: weight,
            diamonds: weight,
            clubs: weight,
        }
    }

    pub fn get(&self, suit: Suit) -> u8 {
        match suit {
            Suit::Hearts => self.hearts,
            Suit::Spades => self.spades,
            Suit::Diamonds => self.diamonds,
            Suit::Clubs => self.clubs,
        }
    }

    pub fn total(&self) -> u32 {
        Suit::ALL.iter().map(|s| self.get(*s) as u32).sum()
    }

    /// Rejects weights above the allowed maximum
    pub fn validate(&self) -> AppResult<()> {
        for suit in Suit::ALL {
            let weight = self.get(suit);
            if weight > MAX_SUIT_WEIGHT {
                return Err(AppError::InvalidInput(format!(
                    "Weight for {} must be between 0 and {}, got {}",
                    suit, MAX_SUIT_WEIGHT, weight
                )));
            }
        }
        Ok(())
    }

    fn clamped(self) -> Self {
        Self {
            hearts: self.hearts.min(MAX_SUIT_WEIGHT),
            spades: self.spades.min(MAX_SUIT_WEIGHT),
            diamonds: self.diamonds.min(MAX_SUIT_WEIGHT),
            clubs: self.clubs.min(MAX_SUIT_WEIGHT),
        }
    }
}

/// Persisted per-user feed preferences
///
/// Serialized as a single camelCase JSON blob. Missing fields fall back to their defaults,
/// so older or partially written blobs still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub suits: SuitWeights,
    #[serde(default = "default_surprise_me")]
    pub surprise_me: bool,
    /// Watch history, most recent last
    #[serde(default)]
    pub watched: Vec<String>,
    #[serde(default)]
    pub liked: Vec<String>,
    #[serde(default)]
    pub blocked: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self::new()
    }
}

impl Preferences {
    /// Creates preferences with every suit weighted equally and surprise mode on
    pub fn new() -> Self {
        Self {
            suits: SuitWeights::default(),
            surprise_me: true,
            watched: Vec::new(),
            liked: Vec::new(),
            blocked: Vec::new(),
        }
    }

    pub fn is_liked(&self, video_id: &str) -> bool {
        self.liked.iter().any(|id| id == video_id)
    }

    pub fn is_blocked(&self, video_id: &str) -> bool {
        self.blocked.iter().any(|id| id == video_id)
    }

    pub fn has_watched(&self, video_id: &str) -> bool {
        self.watched.iter().any(|id| id == video_id)
    }

    /// Appends to the watch history, evicting the oldest entries past `limit`
    ///
    /// Returns whether the history changed.
    pub fn mark_watched(&mut self, video_id: &str, limit: usize) -> bool {
        if self.has_watched(video_id) {
            return false;
        }
        self.watched.push(video_id.to_string());
        self.trim_watched(limit);
        true
    }

    /// Flips the like state of a video and returns the new state
    pub fn toggle_like(&mut self, video_id: &str) -> bool {
        if let Some(index) = self.liked.iter().position(|id| id == video_id) {
            self.liked.remove(index);
            false
        } else {
            self.liked.push(video_id.to_string());
            true
        }
    }

    /// Blocks a video. Returns whether it was newly blocked.
    pub fn block(&mut self, video_id: &str) -> bool {
        if self.is_blocked(video_id) {
            return false;
        }
        self.blocked.push(video_id.to_string());
        true
    }

    /// Repairs a loaded blob so the in-memory invariants hold
    ///
    /// Drops duplicate liked/blocked/watched ids (keeping the first occurrence), clamps suit
    /// weights, and trims the watch history to `watched_limit`.
    pub fn normalized(mut self, watched_limit: usize) -> Self {
        dedup_in_order(&mut self.watched);
        dedup_in_order(&mut self.liked);
        dedup_in_order(&mut self.blocked);
        self.suits = self.suits.clamped();
        self.trim_watched(watched_limit);
        self
    }

    fn trim_watched(&mut self, limit: usize) {
        if self.watched.len() > limit {
            let excess = self.watched.len() - limit;
            self.watched.drain(..excess);
        }
    }
}

fn dedup_in_order(ids: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}
