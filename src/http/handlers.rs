use super::state::{AppState, FullscreenRequest};
use crate::audio::{download_filename, CompressedAudio};
use crate::guard::{GuardNotice, GuardStatus, Page};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub page: Page,
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub hidden: bool,
}

#[derive(Debug, Deserialize)]
pub struct FullscreenRequestBody {
    pub in_fullscreen: bool,
}

#[derive(Debug, Deserialize)]
pub struct MediaBusyRequest {
    pub busy: bool,
}

#[derive(Debug, Serialize)]
pub struct GuardStatusResponse {
    #[serde(flatten)]
    pub guard: GuardStatus,
    pub fullscreen: bool,
    /// Set while the guard is waiting for the host to enter or exit fullscreen
    pub fullscreen_request: Option<FullscreenRequest>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error })).into_response()
}

async fn guard_status(state: &AppState) -> GuardStatusResponse {
    use crate::guard::Viewport;

    GuardStatusResponse {
        guard: state.session.guard().status().await,
        fullscreen: state.viewport.is_fullscreen(),
        fullscreen_request: state.viewport.pending_request(),
    }
}

// ============================================================================
// Guard handlers
// ============================================================================

/// POST /guard/navigate
pub async fn navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigateRequest>,
) -> impl IntoResponse {
    state.session.enter_page(req.page).await;
    Json(guard_status(&state).await)
}

/// POST /guard/visibility
pub async fn visibility(
    State(state): State<AppState>,
    Json(req): Json<VisibilityRequest>,
) -> impl IntoResponse {
    state.session.guard().on_visibility_change(req.hidden).await;
    Json(guard_status(&state).await)
}

/// POST /guard/fullscreen
pub async fn fullscreen(
    State(state): State<AppState>,
    Json(req): Json<FullscreenRequestBody>,
) -> impl IntoResponse {
    state.viewport.report_fullscreen(req.in_fullscreen);
    state.session.guard().on_fullscreen_change().await;
    Json(guard_status(&state).await)
}

/// POST /guard/media-busy
/// The host raises this around its own permission prompts
pub async fn media_busy(
    State(state): State<AppState>,
    Json(req): Json<MediaBusyRequest>,
) -> impl IntoResponse {
    state.session.media_busy().set_busy(req.busy);
    Json(guard_status(&state).await)
}

/// POST /guard/resume
pub async fn resume(State(state): State<AppState>) -> impl IntoResponse {
    state.session.guard().resume_fullscreen().await;
    Json(guard_status(&state).await)
}

/// GET /guard/status
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(guard_status(&state).await)
}

/// GET /guard/notices
/// Drains notices raised since the last poll
pub async fn notices(State(state): State<AppState>) -> impl IntoResponse {
    let drained: Vec<GuardNotice> = state.notices.lock().await.drain(..).collect();
    Json(drained)
}

// ============================================================================
// Recording handlers
// ============================================================================

/// POST /recordings/:q_index
/// Body is the recorder's output; `Content-Type` names its container
pub async fn upload_recording(
    State(state): State<AppState>,
    Path(q_index): Path<usize>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if body.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Recording body is empty".to_string());
    }

    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    info!(
        "Received recording for question {} ({} bytes, {})",
        q_index + 1,
        body.len(),
        mime_type
    );

    let stored = state
        .session
        .store_upload(q_index, CompressedAudio::new(body.to_vec(), mime_type))
        .await;

    if stored.degraded {
        warn!("Question {} stored without WAV conversion", q_index + 1);
    }

    (StatusCode::OK, Json(stored)).into_response()
}

/// GET /recordings/:q_index
pub async fn download_recording(
    State(state): State<AppState>,
    Path(q_index): Path<usize>,
) -> impl IntoResponse {
    let Some(blob) = state.session.recording(q_index).await else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("No recording for question {}", q_index + 1),
        );
    };

    let filename = download_filename(q_index, Utc::now().timestamp_millis(), blob.extension());
    let disposition = format!("attachment; filename=\"{}\"", filename);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, blob.mime_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        blob.bytes().to_vec(),
    )
        .into_response()
}

/// GET /interview/stats
pub async fn interview_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.session.stats().await)
}

/// POST /interview/exit
pub async fn exit_interview(State(state): State<AppState>) -> impl IntoResponse {
    state.session.exit().await;
    Json(state.session.stats().await)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
