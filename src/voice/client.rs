use async_trait::async_trait;
use reqwest::multipart;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::messages::{HealthResponse, VoiceAnalysis};
use crate::audio::WavBlob;
use crate::config::VoiceAnalysisConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VoiceAnalysisError {
    #[error("voice analysis request failed: {0}")]
    Request(String),
    #[error("voice analysis service returned {0}")]
    Status(u16),
    #[error("invalid voice analysis reply: {0}")]
    InvalidReply(String),
}

/// Last known reachability of the analysis service
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Unknown,
    Online,
    Offline,
}

impl Availability {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Availability::Online,
            2 => Availability::Offline,
            _ => Availability::Unknown,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Availability::Unknown => 0,
            Availability::Online => 1,
            Availability::Offline => 2,
        }
    }
}

#[async_trait]
pub trait VoiceAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        wav: &WavBlob,
        question: &str,
        q_index: usize,
    ) -> Result<VoiceAnalysis, VoiceAnalysisError>;
}

/// HTTP client for the optional speech-analysis service.
///
/// Every call updates the cached availability, so the UI can show
/// online/offline without issuing its own probe.
#[derive(Clone)]
pub struct VoiceAnalysisClient {
    client: reqwest::Client,
    base_url: String,
    analyze_timeout: Duration,
    health_timeout: Duration,
    availability: Arc<AtomicU8>,
}

impl VoiceAnalysisClient {
    pub fn new(config: &VoiceAnalysisConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            analyze_timeout: Duration::from_secs(config.analyze_timeout_secs),
            health_timeout: Duration::from_millis(config.health_timeout_ms),
            availability: Arc::new(AtomicU8::new(Availability::Unknown.as_u8())),
        }
    }

    pub fn availability(&self) -> Availability {
        Availability::from_u8(self.availability.load(Ordering::SeqCst))
    }

    fn set_availability(&self, availability: Availability) {
        self.availability.store(availability.as_u8(), Ordering::SeqCst);
    }

    /// Probe `/health`; any non-success or timeout counts as offline
    pub async fn check_health(&self) -> Availability {
        let url = format!("{}/health", self.base_url);
        let result = self
            .client
            .get(&url)
            .timeout(self.health_timeout)
            .send()
            .await;

        let availability = match result {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await.unwrap_or_default();
                debug!(status = %health.status, analyzer = ?health.analyzer_available, "Voice analysis health");
                Availability::Online
            }
            Ok(response) => {
                warn!("Voice analysis health returned {}", response.status());
                Availability::Offline
            }
            Err(e) => {
                debug!("Voice analysis unreachable: {}", e);
                Availability::Offline
            }
        };

        self.set_availability(availability);
        availability
    }

    async fn post_analyze(
        &self,
        wav: &WavBlob,
        question: &str,
        q_index: usize,
    ) -> Result<VoiceAnalysis, VoiceAnalysisError> {
        let url = format!("{}/analyze", self.base_url);

        let audio = multipart::Part::bytes(wav.bytes().to_vec())
            .file_name(format!("answer_q{}.wav", q_index))
            .mime_str(WavBlob::MIME_TYPE)
            .map_err(|e| VoiceAnalysisError::Request(format!("mime: {}", e)))?;

        let question = if question.is_empty() {
            "Interview question".to_string()
        } else {
            question.to_string()
        };

        let form = multipart::Form::new()
            .part("audio", audio)
            .text("question", question)
            .text("q_index", q_index.to_string());

        debug!(q_index, bytes = wav.bytes().len(), "Sending answer for voice analysis");

        let response = self
            .client
            .post(&url)
            .timeout(self.analyze_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceAnalysisError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VoiceAnalysisError::Status(status.as_u16()));
        }

        response
            .json::<VoiceAnalysis>()
            .await
            .map_err(|e| VoiceAnalysisError::InvalidReply(e.to_string()))
    }
}

#[async_trait]
impl VoiceAnalyzer for VoiceAnalysisClient {
    async fn analyze(
        &self,
        wav: &WavBlob,
        question: &str,
        q_index: usize,
    ) -> Result<VoiceAnalysis, VoiceAnalysisError> {
        match self.post_analyze(wav, question, q_index).await {
            Ok(analysis) => {
                self.set_availability(Availability::Online);
                info!(q_index, score = analysis.score, "Voice analysis complete");
                Ok(analysis)
            }
            Err(e) => {
                self.set_availability(Availability::Offline);
                warn!(q_index, "Voice analysis unavailable: {}", e);
                Err(e)
            }
        }
    }
}
