use serde::Serialize;
use std::path::Path;

/// Recorder output: the concatenated slices of one recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedAudio {
    pub data: Vec<u8>,
    /// Container type reported by the recorder, e.g. "audio/webm"
    pub mime_type: String,
}

impl CompressedAudio {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File extension matching the container
    pub fn extension(&self) -> &'static str {
        let essence = self.mime_type.split(';').next().unwrap_or("").trim();
        match essence {
            "audio/webm" | "video/webm" => "webm",
            "audio/ogg" => "ogg",
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => "m4a",
            "audio/mpeg" => "mp3",
            "audio/wav" | "audio/x-wav" | "audio/wave" => "wav",
            _ => "bin",
        }
    }
}

/// Container type for a recording on disk, from its extension
pub fn mime_type_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("webm") => "audio/webm",
        Some("ogg") | Some("oga") => "audio/ogg",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

/// Canonical 16-bit PCM mono WAV bytes (44-byte header, no extension chunks)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBlob {
    bytes: Vec<u8>,
    sample_rate: u32,
    sample_count: usize,
}

impl WavBlob {
    pub const HEADER_LEN: usize = 44;
    pub const MIME_TYPE: &'static str = "audio/wav";

    pub(crate) fn from_parts(bytes: Vec<u8>, sample_rate: u32, sample_count: usize) -> Self {
        Self {
            bytes,
            sample_rate,
            sample_count,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// data-chunk length / (sample rate * 2 bytes)
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count as f64 / self.sample_rate as f64
    }
}

/// What a recording ends up as after transcoding.
///
/// `Compressed` is the degraded path: decoding failed and the recorder's
/// original bytes are kept so a download is still possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioBlob {
    Wav(WavBlob),
    Compressed(CompressedAudio),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Compressed,
}

impl AudioBlob {
    pub fn bytes(&self) -> &[u8] {
        match self {
            AudioBlob::Wav(wav) => wav.bytes(),
            AudioBlob::Compressed(audio) => &audio.data,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            AudioBlob::Wav(_) => WavBlob::MIME_TYPE,
            AudioBlob::Compressed(audio) => &audio.mime_type,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            AudioBlob::Wav(_) => "wav",
            AudioBlob::Compressed(audio) => audio.extension(),
        }
    }

    pub fn format(&self) -> AudioFormat {
        match self {
            AudioBlob::Wav(_) => AudioFormat::Wav,
            AudioBlob::Compressed(_) => AudioFormat::Compressed,
        }
    }

    pub fn as_wav(&self) -> Option<&WavBlob> {
        match self {
            AudioBlob::Wav(wav) => Some(wav),
            AudioBlob::Compressed(_) => None,
        }
    }
}
