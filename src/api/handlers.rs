use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Preferences, RawItem, SuitWeights, Video, VideoResponse},
    services::feed_router::route_videos,
};

use super::AppState;

/// Upper bound on a single bootstrap feed request
pub const MAX_FEED_COUNT: usize = 200;

/// Upper bound on raw search rows
pub const MAX_SEARCH_LIMIT: usize = 100;

const DEFAULT_SEARCH_LIMIT: usize = 20;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub candidates: Vec<Video>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct FilesResponse {
    pub identifier: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurpriseRequest {
    pub surprise_me: bool,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub id: String,
    pub liked: bool,
}

fn to_responses(videos: Vec<Video>) -> Vec<VideoResponse> {
    videos.into_iter().map(VideoResponse::from).collect()
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Fetch a fresh batch from the catalog and order it by the stored preferences
pub async fn get_feed(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<FeedQuery>,
) -> AppResult<Json<Vec<VideoResponse>>> {
    let count = params.count.unwrap_or(state.bootstrap_count);
    if count > MAX_FEED_COUNT {
        return Err(AppError::InvalidInput(format!(
            "count must be at most {}",
            MAX_FEED_COUNT
        )));
    }

    tracing::info!(request_id = %request_id, count, "Building feed");

    let candidates = state.fetcher.fetch_bootstrap(count).await;
    let prefs = state.preferences.load().await;
    let routed = route_videos(candidates, &prefs, &state.tuning);

    tracing::info!(request_id = %request_id, videos = routed.len(), "Feed built");

    Ok(Json(to_responses(routed)))
}

/// Order caller-supplied candidates by the stored preferences
pub async fn route_feed(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RouteRequest>,
) -> Json<Vec<VideoResponse>> {
    let candidates = request.candidates.len();
    let prefs = state.preferences.load().await;
    let routed = route_videos(request.candidates, &prefs, &state.tuning);

    tracing::info!(
        request_id = %request_id,
        candidates,
        routed = routed.len(),
        "Candidates routed"
    );

    Json(to_responses(routed))
}

/// One playable video from a random collection
pub async fn random_video(State(state): State<AppState>) -> AppResult<Json<VideoResponse>> {
    state
        .fetcher
        .random_video()
        .await
        .map(|video| Json(VideoResponse::from(video)))
        .ok_or_else(|| AppError::NotFound("No playable video found".to_string()))
}

/// Raw archive search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<RawItem>>> {
    if params.q.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(MAX_SEARCH_LIMIT);

    Ok(Json(state.fetcher.search(&params.q, limit).await))
}

/// Playable file URLs of an item, smallest first
pub async fn item_files(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Json<FilesResponse> {
    let urls = state.fetcher.resolve_video_urls(&identifier).await;
    Json(FilesResponse { identifier, urls })
}

/// Get stored preferences
pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    Json(state.preferences.load().await)
}

/// Replace all suit weights
pub async fn set_suit_weights(
    State(state): State<AppState>,
    Json(weights): Json<SuitWeights>,
) -> AppResult<Json<Preferences>> {
    Ok(Json(state.preferences.set_suit_weights(weights).await?))
}

/// Turn surprise mode on or off
pub async fn set_surprise(
    State(state): State<AppState>,
    Json(request): Json<SurpriseRequest>,
) -> AppResult<Json<Preferences>> {
    Ok(Json(
        state.preferences.set_surprise_me(request.surprise_me).await?,
    ))
}

/// Record that a video was watched
pub async fn mark_watched(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(video_id): Path<String>,
) -> AppResult<StatusCode> {
    let added = state.preferences.mark_watched(&video_id).await?;
    tracing::debug!(request_id = %request_id, video_id = %video_id, added, "Marked watched");
    Ok(StatusCode::NO_CONTENT)
}

/// Flip the like state of a video
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(video_id): Path<String>,
) -> AppResult<Json<LikeResponse>> {
    let liked = state.preferences.toggle_like(&video_id).await?;
    tracing::debug!(request_id = %request_id, video_id = %video_id, liked, "Toggled like");
    Ok(Json(LikeResponse { id: video_id, liked }))
}

/// Whether a video is liked
pub async fn get_like(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Json<LikeResponse> {
    let liked = state.preferences.is_liked(&video_id).await;
    Json(LikeResponse { id: video_id, liked })
}

/// Hide a video from all future feeds
pub async fn block(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(video_id): Path<String>,
) -> AppResult<StatusCode> {
    let added = state.preferences.block(&video_id).await?;
    tracing::info!(request_id = %request_id, video_id = %video_id, added, "Blocked video");
    Ok(StatusCode::NO_CONTENT)
}
