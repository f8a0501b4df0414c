use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Recordings of a few minutes of compressed audio fit comfortably
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session guard events from the UI shell
        .route("/guard/navigate", post(handlers::navigate))
        .route("/guard/visibility", post(handlers::visibility))
        .route("/guard/fullscreen", post(handlers::fullscreen))
        .route("/guard/media-busy", post(handlers::media_busy))
        .route("/guard/resume", post(handlers::resume))
        .route("/guard/status", get(handlers::status))
        .route("/guard/notices", get(handlers::notices))
        // Answer recordings
        .route(
            "/recordings/:q_index",
            post(handlers::upload_recording).get(handlers::download_recording),
        )
        // Interview lifecycle
        .route("/interview/stats", get(handlers::interview_stats))
        .route("/interview/exit", post(handlers::exit_interview))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        // The UI shell runs on its own origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
