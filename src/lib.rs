pub mod audio;
pub mod config;
pub mod guard;
pub mod http;
pub mod interview;
pub mod llm;
pub mod outcome;
pub mod questions;
pub mod recording;
pub mod timer;
pub mod voice;

pub use audio::{AudioBlob, AudioTranscoder, CompressedAudio, RecordingExporter, WavBlob};
pub use config::Config;
pub use guard::{GuardNotice, MediaBusyGuard, Page, SessionGuard, Viewport};
pub use http::{create_router, AppState, BridgeViewport};
pub use interview::{InterviewConfig, InterviewSession, InterviewStats};
pub use llm::{GeminiClient, TextGenerator};
pub use outcome::Outcome;
pub use questions::{AnswerEvaluator, ExperienceLevel, QuestionGenerator, Round, RoundType};
pub use recording::{CaptureDevice, DeviceStream, RecordingSession, ReplayDevice};
pub use timer::{QuestionTimer, TimerTick};
pub use voice::{VoiceAnalysisClient, VoiceAnalyzer};
