// Shared fakes for the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use interview_capture::audio::{encode_wav, DecodedAudio, WavBlob};
use interview_capture::llm::{TextGenerationError, TextGenerator};
use interview_capture::recording::{
    CaptureDevice, DeviceConstraints, DeviceError, DeviceStream, EncodedChunk,
};
use interview_capture::voice::{VoiceAnalysis, VoiceAnalysisError, VoiceAnalyzer};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// A 16-bit WAV file as a recorder on the host might upload it
pub fn wav_file(sample_rate: u32, channels: u16, seconds: f64, left: i16, right: i16) -> Vec<u8> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let frames = (sample_rate as f64 * seconds) as usize;

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..frames {
            writer.write_sample(left).unwrap();
            if channels == 2 {
                writer.write_sample(right).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Opus packets in an Ogg stream, the way a browser recorder hands them over.
///
/// `seconds` of a sine tone at 48 kHz mono, cut into 20 ms packets.
pub fn ogg_opus_file(seconds: f64, frequency: f32, amplitude: f32) -> Vec<u8> {
    use audiopus::coder::Encoder;
    use audiopus::{Application, Channels, SampleRate};
    use ogg::{PacketWriteEndInfo, PacketWriter};

    const RATE: usize = 48_000;
    const FRAME: usize = 960;
    const PRE_SKIP: u16 = 312;
    const SERIAL: u32 = 0x1a2b_3c4d;

    let encoder = Encoder::new(SampleRate::Hz48000, Channels::Mono, Application::Audio).unwrap();
    let mut writer = PacketWriter::new(Vec::new());

    let mut head = b"OpusHead".to_vec();
    head.push(1);
    head.push(1);
    head.extend_from_slice(&PRE_SKIP.to_le_bytes());
    head.extend_from_slice(&(RATE as u32).to_le_bytes());
    head.extend_from_slice(&0i16.to_le_bytes());
    head.push(0);
    writer
        .write_packet(head.into_boxed_slice(), SERIAL, PacketWriteEndInfo::EndPage, 0)
        .unwrap();

    let vendor = b"interview-capture tests";
    let mut tags = b"OpusTags".to_vec();
    tags.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    tags.extend_from_slice(vendor);
    tags.extend_from_slice(&0u32.to_le_bytes());
    writer
        .write_packet(tags.into_boxed_slice(), SERIAL, PacketWriteEndInfo::EndPage, 0)
        .unwrap();

    let packets = ((RATE as f64 * seconds) as usize) / FRAME;
    let mut output = [0u8; 4000];
    for p in 0..packets {
        let frame: Vec<f32> = (0..FRAME)
            .map(|i| {
                let t = (p * FRAME + i) as f32 / RATE as f32;
                amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect();
        let len = encoder.encode_float(&frame, &mut output).unwrap();

        let end = if p + 1 == packets {
            PacketWriteEndInfo::EndStream
        } else {
            PacketWriteEndInfo::NormalPacket
        };
        let granule = PRE_SKIP as u64 + ((p + 1) * FRAME) as u64;
        writer
            .write_packet(output[..len].to_vec().into_boxed_slice(), SERIAL, end, granule)
            .unwrap();
    }

    writer.into_inner()
}

pub fn wav_blob(sample_rate: u32, samples: usize) -> WavBlob {
    encode_wav(&DecodedAudio {
        sample_rate,
        samples: vec![0.1; samples],
    })
    .unwrap()
}

/// Text generator answering from a script; prompts are recorded.
///
/// A rule matches when the prompt contains its needle. Unmatched prompts
/// get the default reply, or an error when there is none.
#[derive(Default)]
pub struct ScriptedText {
    rules: Vec<(String, Duration, String)>,
    default_reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedText {
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn replying(reply: &str) -> Self {
        Self {
            default_reply: Some(reply.to_string()),
            ..Self::default()
        }
    }

    pub fn when(mut self, needle: &str, delay: Duration, reply: &str) -> Self {
        self.rules
            .push((needle.to_string(), delay, reply.to_string()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedText {
    async fn generate(&self, prompt: &str, _max_tokens: u32) -> Result<String, TextGenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if let Some((_, delay, reply)) = self.rules.iter().find(|(n, _, _)| prompt.contains(n)) {
            tokio::time::sleep(*delay).await;
            return Ok(reply.clone());
        }

        self.default_reply
            .clone()
            .ok_or_else(|| TextGenerationError::AllModelsFailed(vec!["scripted".to_string()]))
    }
}

/// Voice analyzer that returns a fixed transcript
pub struct FixedVoice {
    pub transcript: String,
    pub calls: AtomicUsize,
}

impl FixedVoice {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl VoiceAnalyzer for FixedVoice {
    async fn analyze(
        &self,
        wav: &WavBlob,
        _question: &str,
        _q_index: usize,
    ) -> Result<VoiceAnalysis, VoiceAnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(VoiceAnalysis {
            score: 72.0,
            transcript: self.transcript.clone(),
            duration: wav.duration_seconds(),
            ..VoiceAnalysis::default()
        })
    }
}

/// How a `FakeDevice` misbehaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeMode {
    Deny,
    /// The first request is denied, later ones are granted
    DenyFirst,
    RecorderFails,
}

/// Device that fails in a chosen way, counting opens and releases
pub struct FakeDevice {
    mode: FakeMode,
    requests: AtomicUsize,
    pub opened: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
}

impl FakeDevice {
    pub fn new(mode: FakeMode) -> Self {
        Self {
            mode,
            requests: AtomicUsize::new(0),
            opened: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl CaptureDevice for FakeDevice {
    async fn open(
        &self,
        _constraints: &DeviceConstraints,
    ) -> Result<Box<dyn DeviceStream>, DeviceError> {
        // Stand-in for the permission prompt
        let attempt = self.requests.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(300)).await;

        let denied = match self.mode {
            FakeMode::Deny => true,
            FakeMode::DenyFirst => attempt == 0,
            FakeMode::RecorderFails => false,
        };
        if denied {
            return Err(DeviceError::AccessDenied("NotAllowedError".to_string()));
        }

        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            released: Arc::clone(&self.released),
        }))
    }

    fn name(&self) -> &str {
        "fake"
    }
}

struct FakeStream {
    released: Arc<AtomicUsize>,
}

#[async_trait]
impl DeviceStream for FakeStream {
    fn start_recorder(
        &mut self,
        _timeslice: Duration,
    ) -> Result<mpsc::Receiver<EncodedChunk>, DeviceError> {
        Err(DeviceError::RecorderFailed("NotSupportedError".to_string()))
    }

    async fn stop_recorder(&mut self) {}

    fn release(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    fn mime_type(&self) -> &str {
        "audio/webm"
    }
}
