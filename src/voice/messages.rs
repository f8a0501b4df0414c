use serde::{Deserialize, Serialize};

/// `/analyze` reply. The service fills what it managed to compute, so every
/// field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceAnalysis {
    pub score: f64,
    pub transcript: String,
    pub wpm: f64,
    pub filler_count: u32,
    /// Seconds of speech
    pub duration: f64,
    pub features: AcousticFeatures,
    pub suggestions: Vec<String>,
    /// Set when the service answered with placeholder data
    pub mock: bool,
    pub success: Option<bool>,
    pub acoustic_ok: Option<bool>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcousticFeatures {
    pub pitch_mean: f64,
    pub pitch_std: f64,
    pub jitter: f64,
    pub shimmer: f64,
    pub energy: f64,
    pub hnr: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HealthResponse {
    pub status: String,
    pub analyzer_available: Option<bool>,
}
