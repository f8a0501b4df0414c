pub mod client;
pub mod messages;

pub use client::{Availability, VoiceAnalysisClient, VoiceAnalysisError, VoiceAnalyzer};
pub use messages::{AcousticFeatures, VoiceAnalysis};
