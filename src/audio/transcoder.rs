use std::sync::Arc;
use tracing::{info, warn};

use super::blob::{AudioBlob, CompressedAudio};
use super::context::{DecodingContextFactory, SharedDecodingContext};
use super::wav::encode_wav;
use crate::outcome::Outcome;

/// Turns recorder output into downloadable WAV.
///
/// All decoding goes through one `SharedDecodingContext` for the whole
/// interview; building a context per recording runs into the platform's
/// per-page ceiling after a handful of questions.
pub struct AudioTranscoder {
    context: SharedDecodingContext,
}

impl AudioTranscoder {
    pub fn new(factory: Arc<dyn DecodingContextFactory>) -> Self {
        Self {
            context: SharedDecodingContext::new(factory),
        }
    }

    pub fn context(&self) -> &SharedDecodingContext {
        &self.context
    }

    /// Decode and re-encode as 16-bit PCM mono WAV.
    ///
    /// Never fails: if anything goes wrong the original bytes come back as
    /// `Outcome::Fallback(AudioBlob::Compressed(..))`.
    pub async fn to_wav(&self, audio: &CompressedAudio) -> Outcome<AudioBlob> {
        if audio.is_empty() {
            return self.passthrough(audio, "recording is empty".to_string());
        }

        let ctx = match self.context.acquire().await {
            Ok(ctx) => ctx,
            Err(e) => return self.passthrough(audio, format!("decoding context: {}", e)),
        };

        let decoded = match ctx.decode(&audio.data, &audio.mime_type).await {
            Ok(decoded) => decoded,
            Err(e) => return self.passthrough(audio, e.to_string()),
        };

        match encode_wav(&decoded) {
            Ok(wav) => {
                info!(
                    "Transcoded {} bytes of {} to WAV ({:.1}s at {}Hz)",
                    audio.data.len(),
                    audio.mime_type,
                    wav.duration_seconds(),
                    wav.sample_rate()
                );
                Outcome::ok(AudioBlob::Wav(wav))
            }
            Err(e) => self.passthrough(audio, format!("{:#}", e)),
        }
    }

    fn passthrough(&self, audio: &CompressedAudio, reason: String) -> Outcome<AudioBlob> {
        warn!("WAV transcode fell back to {}: {}", audio.mime_type, reason);
        Outcome::fallback(AudioBlob::Compressed(audio.clone()), reason)
    }
}
