use crate::models::{RawItem, Suit};

/// Keyword matches needed before a detected suit replaces the collection default
pub const DEFAULT_MIN_KEYWORD_MATCHES: usize = 2;

const HEARTS_KEYWORDS: &[&str] = &[
    "love", "family", "friend", "heart", "romance", "emotion", "feel", "cute", "sweet",
    "together", "care", "hug",
];

const SPADES_KEYWORDS: &[&str] = &[
    "learn", "education", "science", "history", "news", "analysis", "research", "study",
    "fact", "explain", "understand", "think",
];

const DIAMONDS_KEYWORDS: &[&str] = &[
    "how", "build", "make", "craft", "tutorial", "guide", "diy", "cook", "repair", "create",
    "practical", "step",
];

const CLUBS_KEYWORDS: &[&str] = &[
    "action", "energy", "power", "fast", "wild", "hype", "fight", "race", "sport", "dance",
    "music", "party", "adventure",
];

fn keywords(suit: Suit) -> &'static [&'static str] {
    match suit {
        Suit::Hearts => HEARTS_KEYWORDS,
        Suit::Spades => SPADES_KEYWORDS,
        Suit::Diamonds => DIAMONDS_KEYWORDS,
        Suit::Clubs => CLUBS_KEYWORDS,
    }
}

/// Assigns a suit to an archive item using the default match threshold
pub fn classify(item: &RawItem, default_suit: Suit) -> Suit {
    classify_with_threshold(item, default_suit, DEFAULT_MIN_KEYWORD_MATCHES)
}

/// Assigns a suit to an archive item from keywords in its title, description and subjects
///
/// Each suit scores one point per keyword found as a substring of the lowercased text.
/// The highest score wins, earlier suits winning ties. The winner only replaces
/// `default_suit` when it reaches `min_matches`, so a single incidental word doesn't
/// reclassify an item away from its collection.
pub fn classify_with_threshold(item: &RawItem, default_suit: Suit, min_matches: usize) -> Suit {
    let text = searchable_text(item);

    let mut max_score = 0;
    let mut detected = default_suit;
    for suit in Suit::ALL {
        let score = keyword_score(&text, suit);
        if score > max_score {
            max_score = score;
            detected = suit;
        }
    }

    if max_score >= min_matches {
        detected
    } else {
        default_suit
    }
}

fn searchable_text(item: &RawItem) -> String {
    format!(
        "{} {} {}",
        item.title.as_deref().unwrap_or_default(),
        item.description.as_deref().unwrap_or_default(),
        item.subject.join(" ")
    )
    .to_lowercase()
}

fn keyword_score(text: &str, suit: Suit) -> usize {
    keywords(suit).iter().filter(|k| text.contains(*k)).count()
}
