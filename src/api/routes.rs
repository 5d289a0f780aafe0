use axum::{
    middleware::from_fn,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Feed
        .route("/feed", get(handlers::get_feed))
        .route("/feed/route", post(handlers::route_feed))
        .route("/videos/random", get(handlers::random_video))
        // Archive pass-through
        .route("/search", get(handlers::search))
        .route("/items/:identifier/files", get(handlers::item_files))
        // Preferences
        .route("/preferences", get(handlers::get_preferences))
        .route("/preferences/suits", put(handlers::set_suit_weights))
        .route("/preferences/surprise", put(handlers::set_surprise))
        // Feedback
        .route("/videos/:id/watched", post(handlers::mark_watched))
        .route(
            "/videos/:id/like",
            post(handlers::toggle_like).get(handlers::get_like),
        )
        .route("/videos/:id/block", post(handlers::block))
}
