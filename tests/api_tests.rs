use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use suit_feed::{
    api::{create_router, AppState},
    config::FeedTuning,
    db::InMemoryStore,
    error::{AppError, AppResult},
    models::{RawItem, Suit},
    services::{
        catalog::Collection,
        providers::ArchiveProvider,
        ArchiveFetcher, PreferenceStore,
    },
};

/// Serves a fixed archive: one search result per query, one file per item
struct FixtureArchive;

#[async_trait::async_trait]
impl ArchiveProvider for FixtureArchive {
    async fn search(&self, query: &str, _rows: usize) -> AppResult<Vec<RawItem>> {
        let (identifier, title) = match query {
            "collection:classic_tv" => ("lucy", "I Love Lucy"),
            "collection:prelinger" => ("duck_and_cover", "Duck and Cover"),
            "broken" => return Err(AppError::ExternalApi("503".to_string())),
            _ => return Ok(vec![]),
        };
        Ok(vec![RawItem {
            identifier: identifier.to_string(),
            title: Some(title.to_string()),
            description: None,
            mediatype: "movies".to_string(),
            collection: vec![],
            subject: vec![],
        }])
    }

    async fn video_urls(&self, identifier: &str) -> AppResult<Vec<String>> {
        Ok(vec![format!(
            "https://archive.org/download/{}/{}.mp4",
            identifier, identifier
        )])
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

fn create_test_server() -> TestServer {
    let catalog = vec![
        Collection {
            query: "collection:classic_tv",
            default_suit: Suit::Hearts,
            name: "Classic TV",
        },
        Collection {
            query: "collection:prelinger",
            default_suit: Suit::Spades,
            name: "Prelinger Archives",
        },
    ];
    let tuning = FeedTuning::default();
    let fetcher = ArchiveFetcher::with_catalog(Arc::new(FixtureArchive), catalog, 2);
    let preferences = PreferenceStore::new(
        Arc::new(InMemoryStore::new()),
        "dtiktok_preferences",
        tuning.watched_limit,
    );

    let state = AppState::new(fetcher, preferences, tuning, 2);
    TestServer::new(create_router(state)).unwrap()
}

fn ids(videos: &[Value]) -> Vec<&str> {
    videos.iter().map(|v| v["id"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_header_is_set() {
    let server = create_test_server();
    let response = server.get("/health").await;
    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn test_default_preferences() {
    let server = create_test_server();
    let response = server.get("/api/v1/preferences").await;
    response.assert_status_ok();

    let prefs: Value = response.json();
    assert_eq!(prefs["surpriseMe"], true);
    assert_eq!(prefs["suits"]["hearts"], 3);
    assert_eq!(prefs["watched"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_feed_follows_suit_weights() {
    let server = create_test_server();

    server
        .put("/api/v1/preferences/surprise")
        .json(&json!({ "surpriseMe": false }))
        .await
        .assert_status_ok();
    server
        .put("/api/v1/preferences/suits")
        .json(&json!({ "hearts": 0, "spades": 5, "diamonds": 0, "clubs": 0 }))
        .await
        .assert_status_ok();

    let response = server.get("/api/v1/feed").await;
    response.assert_status_ok();

    let videos: Vec<Value> = response.json();
    assert_eq!(ids(&videos), vec!["duck_and_cover", "lucy"]);
    assert_eq!(videos[0]["suit"], "spades");
    assert_eq!(videos[0]["suitSymbol"], "♠");
    assert_eq!(
        videos[1]["url"],
        "https://archive.org/download/lucy/lucy.mp4"
    );
}

#[tokio::test]
async fn test_feed_rejects_huge_count() {
    let server = create_test_server();
    let response = server.get("/api/v1/feed").add_query_param("count", 10_000).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_blocked_and_watched_leave_feed() {
    let server = create_test_server();

    server
        .put("/api/v1/preferences/surprise")
        .json(&json!({ "surpriseMe": false }))
        .await
        .assert_status_ok();
    server
        .post("/api/v1/videos/lucy/block")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let videos: Vec<Value> = server.get("/api/v1/feed").await.json();
    assert_eq!(ids(&videos), vec!["duck_and_cover"]);

    server
        .post("/api/v1/videos/duck_and_cover/watched")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let videos: Vec<Value> = server.get("/api/v1/feed").await.json();
    assert!(videos.is_empty());

    let prefs: Value = server.get("/api/v1/preferences").await.json();
    assert_eq!(prefs["blocked"], json!(["lucy"]));
    assert_eq!(prefs["watched"], json!(["duck_and_cover"]));
}

#[tokio::test]
async fn test_toggle_like() {
    let server = create_test_server();

    let response = server.post("/api/v1/videos/lucy/like").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["liked"], true);

    let response = server.get("/api/v1/videos/lucy/like").await;
    assert_eq!(response.json::<Value>()["liked"], true);

    let response = server.post("/api/v1/videos/lucy/like").await;
    assert_eq!(response.json::<Value>()["liked"], false);

    let prefs: Value = server.get("/api/v1/preferences").await.json();
    assert_eq!(prefs["liked"], json!([]));
}

#[tokio::test]
async fn test_invalid_suit_weight() {
    let server = create_test_server();
    let response = server
        .put("/api/v1/preferences/suits")
        .json(&json!({ "hearts": 6, "spades": 0, "diamonds": 0, "clubs": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let prefs: Value = server.get("/api/v1/preferences").await.json();
    assert_eq!(prefs["suits"]["hearts"], 3);
}

#[tokio::test]
async fn test_route_supplied_candidates() {
    let server = create_test_server();

    server
        .put("/api/v1/preferences/surprise")
        .json(&json!({ "surpriseMe": false }))
        .await;
    server
        .put("/api/v1/preferences/suits")
        .json(&json!({ "hearts": 5, "spades": 0, "diamonds": 0, "clubs": 0 }))
        .await;

    let candidates = json!({
        "candidates": [
            {
                "id": "s1",
                "source": "archive",
                "url": "https://archive.org/download/s1/s1.mp4",
                "title": "Spade",
                "suit": "spades",
                "tags": [],
                "createdAt": "2024-01-01T00:00:00Z"
            },
            {
                "id": "h1",
                "source": "upload",
                "url": "https://example.org/h1.mp4",
                "title": "Heart",
                "suit": "hearts",
                "createdAt": "2024-01-01T00:00:00Z"
            }
        ]
    });

    let response = server.post("/api/v1/feed/route").json(&candidates).await;
    response.assert_status_ok();

    let videos: Vec<Value> = response.json();
    assert_eq!(ids(&videos), vec!["h1", "s1"]);
}

#[tokio::test]
async fn test_search_passthrough() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/search")
        .add_query_param("q", "collection:classic_tv")
        .await;
    response.assert_status_ok();
    let items: Vec<Value> = response.json();
    assert_eq!(items[0]["identifier"], "lucy");

    let response = server
        .get("/api/v1/search")
        .add_query_param("q", "broken")
        .await;
    response.assert_status_ok();
    assert!(response.json::<Vec<Value>>().is_empty());

    let response = server.get("/api/v1/search").add_query_param("q", " ").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_item_files() {
    let server = create_test_server();
    let response = server.get("/api/v1/items/lucy/files").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["identifier"], "lucy");
    assert_eq!(
        body["urls"],
        json!(["https://archive.org/download/lucy/lucy.mp4"])
    );
}

#[tokio::test]
async fn test_random_video() {
    let server = create_test_server();
    let response = server.get("/api/v1/videos/random").await;
    response.assert_status_ok();

    let video: Value = response.json();
    assert!(["lucy", "duck_and_cover"].contains(&video["id"].as_str().unwrap()));
}
