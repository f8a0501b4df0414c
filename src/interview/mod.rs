//! Interview session management
//!
//! `InterviewSession` is the one object an interview page talks to. It owns:
//! - the session guard and media-busy flag
//! - the question countdown
//! - camera and microphone handles
//! - per-question recordings, voice analyses and evaluations

mod config;
mod session;
mod stats;

pub use config::InterviewConfig;
pub use session::InterviewSession;
pub use stats::{InterviewStats, QuestionSlot, StoredRecording};
