use crate::models::Suit;

/// A curated archive query and the suit its results get unless the classifier says otherwise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collection {
    pub query: &'static str,
    pub default_suit: Suit,
    pub name: &'static str,
}

const fn collection(query: &'static str, default_suit: Suit, name: &'static str) -> Collection {
    Collection {
        query,
        default_suit,
        name,
    }
}

/// Queries used to seed a feed, grouped by default suit
pub const CATALOG: &[Collection] = &[
    // Hearts
    collection("collection:classic_cartoons", Suit::Hearts, "Classic Cartoons"),
    collection("collection:classic_tv", Suit::Hearts, "Classic TV"),
    collection("subject:family AND mediatype:movies", Suit::Hearts, "Family Films"),
    collection("collection:feature_films", Suit::Hearts, "Feature Films"),
    // Spades
    collection("collection:prelinger", Suit::Spades, "Prelinger Archives"),
    collection("collection:educationalfilms", Suit::Spades, "Educational Films"),
    collection("collection:opensource_movies", Suit::Spades, "Open Source Movies"),
    collection("subject:documentary AND mediatype:movies", Suit::Spades, "Documentaries"),
    // Diamonds
    collection("collection:nasa", Suit::Diamonds, "NASA"),
    collection("collection:stock_footage", Suit::Diamonds, "Stock Footage"),
    collection("subject:\"how to\" AND mediatype:movies", Suit::Diamonds, "How-To"),
    collection("collection:computersandtechvideos", Suit::Diamonds, "Tech Videos"),
    // Clubs
    collection("subject:animation AND mediatype:movies", Suit::Clubs, "Animation"),
    collection("subject:sports AND mediatype:movies", Suit::Clubs, "Sports"),
    collection("collection:short_films", Suit::Clubs, "Short Films"),
    collection("subject:music AND mediatype:movies", Suit::Clubs, "Music Videos"),
];
