use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod archive;
pub mod preferences;

pub use archive::{ArchiveFile, RawItem};
pub use preferences::{Preferences, SuitWeights};

/// Categorical tone label attached to every video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Spades,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All suits in enumeration order. Classifier ties resolve to the earliest entry.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Spades, Suit::Diamonds, Suit::Clubs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Spades => "spades",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
        }
    }

    /// Card symbol used by clients when rendering the suit badge
    pub fn symbol(&self) -> &'static str {
        match self {
            Suit::Hearts => "♥",
            Suit::Spades => "♠",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
        }
    }

    /// CSS class name for the suit badge
    pub fn css_class(&self) -> String {
        format!("suit-{}", self.as_str())
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a video's media lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoSource {
    Archive,
    Ipfs,
    Upload,
}

/// A playable, classified feed entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub source: VideoSource,
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub suit: Suit,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Video {
    /// Builds an archive-sourced video from a search hit and its canonical file URL
    pub fn from_archive(item: RawItem, url: String, suit: Suit) -> Self {
        Self {
            id: item.identifier,
            source: VideoSource::Archive,
            url,
            title: item.title.unwrap_or_else(|| "Untitled".to_string()),
            description: item.description,
            suit,
            tags: item.subject,
            created_at: Utc::now(),
        }
    }
}

/// Video plus display hints, as returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    #[serde(flatten)]
    pub video: Video,
    pub suit_symbol: &'static str,
    pub suit_class: String,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        Self {
            suit_symbol: video.suit.symbol(),
            suit_class: video.suit.css_class(),
            video,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suit_serde_lowercase() {
        let json = serde_json::to_string(&Suit::Diamonds).unwrap();
        assert_eq!(json, r#""diamonds""#);

        let suit: Suit = serde_json::from_str(r#""clubs""#).unwrap();
        assert_eq!(suit, Suit::Clubs);
    }

    #[test]
    fn test_suit_display_helpers() {
        assert_eq!(Suit::Hearts.symbol(), "♥");
        assert_eq!(Suit::Spades.css_class(), "suit-spades");
        assert_eq!(format!("{}", Suit::Clubs), "clubs");
    }

    #[test]
    fn test_video_from_archive_defaults_title() {
        let item = RawItem {
            identifier: "night_of_the_living_dead".to_string(),
            title: None,
            description: Some("A classic".to_string()),
            mediatype: "movies".to_string(),
            collection: vec!["feature_films".to_string()],
            subject: vec!["horror".to_string(), "zombies".to_string()],
        };

        let video = Video::from_archive(
            item,
            "https://archive.org/download/x/x.mp4".to_string(),
            Suit::Clubs,
        );

        assert_eq!(video.id, "night_of_the_living_dead");
        assert_eq!(video.title, "Untitled");
        assert_eq!(video.source, VideoSource::Archive);
        assert_eq!(video.tags, vec!["horror", "zombies"]);
        assert_eq!(video.suit, Suit::Clubs);
    }

    #[test]
    fn test_video_serializes_camel_case() {
        let video = Video {
            id: "abc".to_string(),
            source: VideoSource::Archive,
            url: "https://example.org/abc.mp4".to_string(),
            title: "Abc".to_string(),
            description: None,
            suit: Suit::Hearts,
            tags: vec![],
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(VideoResponse::from(video)).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("description").is_none());
        assert_eq!(value["suit"], "hearts");
        assert_eq!(value["suitSymbol"], "♥");
        assert_eq!(value["suitClass"], "suit-hearts");
    }
}
