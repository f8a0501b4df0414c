use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub audio: AudioConfig,
    pub guard: GuardConfig,
    pub timer: TimerConfig,
    pub text_generation: TextGenerationConfig,
    pub voice_analysis: VoiceAnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "interview-capture".to_string(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5050,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Where downloaded answers are written
    pub recordings_path: String,
    /// Recorder slice interval in milliseconds
    pub timeslice_ms: u64,
    /// Live decoding contexts the platform tolerates before refusing new ones
    pub max_decoding_contexts: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            recordings_path: "recordings".to_string(),
            timeslice_ms: 100,
            max_decoding_contexts: 6,
        }
    }
}

impl AudioConfig {
    pub fn timeslice(&self) -> Duration {
        Duration::from_millis(self.timeslice_ms)
    }
}

/// Timing knobs for the fullscreen / tab-switch guard.
///
/// The defaults were tuned against one browser's permission-prompt timing;
/// other environments may need different values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Hidden periods at or below this are treated as noise
    pub tab_switch_threshold_ms: u64,
    /// Quiet period before a fullscreen exit is reported
    pub fullscreen_debounce_ms: u64,
    /// How long the media-busy flag outlives the device request
    pub media_busy_grace_ms: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            tab_switch_threshold_ms: 800,
            fullscreen_debounce_ms: 800,
            media_busy_grace_ms: 1200,
        }
    }
}

impl GuardConfig {
    pub fn tab_switch_threshold(&self) -> Duration {
        Duration::from_millis(self.tab_switch_threshold_ms)
    }

    pub fn fullscreen_debounce(&self) -> Duration {
        Duration::from_millis(self.fullscreen_debounce_ms)
    }

    pub fn media_busy_grace(&self) -> Duration {
        Duration::from_millis(self.media_busy_grace_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub warning_at_secs: u32,
    pub danger_at_secs: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            warning_at_secs: 30,
            danger_at_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextGenerationConfig {
    pub base_url: String,
    pub api_key: String,
    /// Tried in order until one answers
    pub models: Vec<String>,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for TextGenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            models: vec![
                "gemini-2.0-flash".to_string(),
                "gemini-1.5-flash".to_string(),
                "gemini-1.5-flash-latest".to_string(),
                "gemini-pro".to_string(),
            ],
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceAnalysisConfig {
    pub enabled: bool,
    pub base_url: String,
    /// Transcription is slow; keep this generous
    pub analyze_timeout_secs: u64,
    pub health_timeout_ms: u64,
}

impl Default for VoiceAnalysisConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:5000".to_string(),
            analyze_timeout_secs: 120,
            health_timeout_ms: 2000,
        }
    }
}

impl Config {
    /// Load `path` (any format the `config` crate understands, extension
    /// optional) layered under `INTERVIEW__SECTION__KEY` environment overrides.
    /// A missing file is fine; every field has a default.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("INTERVIEW").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
