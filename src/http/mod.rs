//! HTTP bridge between a UI shell and the interview session
//!
//! The shell owns the real window and devices; it forwards browser events
//! here and uploads finished recordings:
//! - POST /guard/navigate, /guard/visibility, /guard/fullscreen, /guard/media-busy, /guard/resume
//! - GET /guard/status, /guard/notices
//! - POST /recordings/:q_index - Upload and transcode an answer
//! - GET /recordings/:q_index - Download an answer
//! - GET /interview/stats, POST /interview/exit
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, BridgeViewport, FullscreenRequest, HostOwnedDevice, MAX_PENDING_NOTICES};
