use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::audio::{AudioBlob, AudioFormat};
use crate::guard::GuardStatus;
use crate::outcome::Outcome;
use crate::questions::Evaluation;
use crate::voice::VoiceAnalysis;

/// Everything collected for one question, keyed by its index
#[derive(Debug, Clone, Default)]
pub struct QuestionSlot {
    pub recording: Option<AudioBlob>,
    /// The recording is the recorder's original bytes, not WAV
    pub degraded: bool,
    pub answer: Option<String>,
    pub voice: Option<VoiceAnalysis>,
    pub evaluation: Option<Outcome<Evaluation>>,
}

/// Result of storing an answer recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecording {
    pub q_index: usize,
    pub format: AudioFormat,
    pub degraded: bool,
    pub bytes: usize,
}

/// Snapshot of an interview in progress
#[derive(Debug, Clone, Serialize)]
pub struct InterviewStats {
    /// When the interview started
    pub started_at: DateTime<Utc>,

    /// Whether a question is being recorded right now
    pub is_recording: bool,

    /// Question currently being recorded
    pub recording_question: Option<usize>,

    /// Live recording timer
    pub recording_elapsed_secs: u64,

    pub camera_active: bool,

    /// Questions with a stored recording
    pub recordings: usize,

    /// Questions with a finished evaluation
    pub evaluations: usize,

    pub guard: GuardStatus,

    pub exited: bool,
}
