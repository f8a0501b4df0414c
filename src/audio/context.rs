use std::io::Cursor;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_OPUS};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::opus::{OpusTrack, OPUS_SAMPLE_RATE};

/// Mono PCM at the source's native rate
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Running,
    Suspended,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("decoding context limit reached ({0} live)")]
    ContextLimit(usize),
    #[error("decoding context is closed")]
    Closed,
    #[error("unsupported or corrupt audio: {0}")]
    Unsupported(String),
    #[error("no audio decoded")]
    Empty,
    #[error("decoder task failed: {0}")]
    Task(String),
}

/// A platform audio-decoding resource.
///
/// These are expensive and capped per page, so the crate only ever holds one
/// through `SharedDecodingContext`.
#[async_trait::async_trait]
pub trait DecodingContext: Send + Sync {
    fn state(&self) -> ContextState;

    async fn resume(&self) -> Result<(), DecodeError>;

    /// Decode a whole compressed recording to mono float PCM
    async fn decode(&self, data: &[u8], mime_type: &str) -> Result<DecodedAudio, DecodeError>;

    fn close(&self);
}

pub trait DecodingContextFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn DecodingContext>, DecodeError>;
}

/// Lazily created, process-wide decoding context.
///
/// The first `acquire` creates the context; every later call reuses it,
/// resuming it if the host suspended it. A new one is only built if the old
/// one was closed.
pub struct SharedDecodingContext {
    factory: Arc<dyn DecodingContextFactory>,
    slot: Mutex<Option<Arc<dyn DecodingContext>>>,
    created: AtomicUsize,
}

impl SharedDecodingContext {
    pub fn new(factory: Arc<dyn DecodingContextFactory>) -> Self {
        Self {
            factory,
            slot: Mutex::new(None),
            created: AtomicUsize::new(0),
        }
    }

    pub async fn acquire(&self) -> Result<Arc<dyn DecodingContext>, DecodeError> {
        let mut slot = self.slot.lock().await;

        let reusable = slot
            .as_ref()
            .filter(|ctx| ctx.state() != ContextState::Closed)
            .cloned();

        let ctx = match reusable {
            Some(ctx) => ctx,
            None => {
                let ctx = self.factory.create()?;
                let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
                info!("Created shared decoding context (#{})", n);
                *slot = Some(Arc::clone(&ctx));
                ctx
            }
        };

        if ctx.state() == ContextState::Suspended {
            if let Err(e) = ctx.resume().await {
                warn!("Failed to resume decoding context: {}", e);
            }
        }

        Ok(ctx)
    }

    /// Contexts built over this wrapper's lifetime
    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Explicit teardown. Not needed for normal operation.
    pub async fn close(&self) {
        if let Some(ctx) = self.slot.lock().await.take() {
            ctx.close();
            info!("Shared decoding context closed");
        }
    }
}

const STATE_RUNNING: u8 = 0;
const STATE_SUSPENDED: u8 = 1;
const STATE_CLOSED: u8 = 2;

/// Builds symphonia-backed contexts, refusing past a fixed number of live
/// instances the way the browser does.
pub struct SymphoniaContextFactory {
    live: Arc<AtomicUsize>,
    limit: usize,
}

impl SymphoniaContextFactory {
    pub fn new(limit: usize) -> Self {
        Self {
            live: Arc::new(AtomicUsize::new(0)),
            limit,
        }
    }

    pub fn live_contexts(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl DecodingContextFactory for SymphoniaContextFactory {
    fn create(&self) -> Result<Arc<dyn DecodingContext>, DecodeError> {
        let limit = self.limit;
        self.live
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < limit).then_some(n + 1)
            })
            .map_err(DecodeError::ContextLimit)?;

        Ok(Arc::new(SymphoniaContext {
            state: AtomicU8::new(STATE_RUNNING),
            live: Arc::clone(&self.live),
        }))
    }
}

pub struct SymphoniaContext {
    state: AtomicU8,
    live: Arc<AtomicUsize>,
}

impl SymphoniaContext {
    /// Hosts suspend idle contexts (e.g. when the page is backgrounded)
    pub fn suspend(&self) {
        let _ = self.state.compare_exchange(
            STATE_RUNNING,
            STATE_SUSPENDED,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

#[async_trait::async_trait]
impl DecodingContext for SymphoniaContext {
    fn state(&self) -> ContextState {
        match self.state.load(Ordering::SeqCst) {
            STATE_RUNNING => ContextState::Running,
            STATE_SUSPENDED => ContextState::Suspended,
            _ => ContextState::Closed,
        }
    }

    async fn resume(&self) -> Result<(), DecodeError> {
        match self.state.compare_exchange(
            STATE_SUSPENDED,
            STATE_RUNNING,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) | Err(STATE_RUNNING) => Ok(()),
            Err(_) => Err(DecodeError::Closed),
        }
    }

    async fn decode(&self, data: &[u8], mime_type: &str) -> Result<DecodedAudio, DecodeError> {
        if self.state() == ContextState::Closed {
            return Err(DecodeError::Closed);
        }

        let data = data.to_vec();
        let mime_type = mime_type.to_string();
        tokio::task::spawn_blocking(move || decode_first_channel(data, &mime_type))
            .await
            .map_err(|e| DecodeError::Task(e.to_string()))?
    }

    fn close(&self) {
        if self.state.swap(STATE_CLOSED, Ordering::SeqCst) != STATE_CLOSED {
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for SymphoniaContext {
    fn drop(&mut self) {
        self.close();
    }
}

enum TrackDecoder {
    Symphonia(Box<dyn Decoder>),
    Opus(OpusTrack),
}

/// Probe, decode every packet of the default track and keep channel 0.
fn decode_first_channel(data: Vec<u8>, mime_type: &str) -> Result<DecodedAudio, DecodeError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

    let mut hint = Hint::new();
    let essence = mime_type.split(';').next().unwrap_or("").trim();
    if !essence.is_empty() {
        hint.mime_type(essence);
    }
    if let Some(ext) = essence.strip_prefix("audio/") {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DecodeError::Unsupported(format!("probe: {}", e)))?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| DecodeError::Unsupported("no audio track".to_string()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = if codec_params.codec == CODEC_TYPE_OPUS {
        let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);
        TrackDecoder::Opus(OpusTrack::new(
            channels,
            codec_params.delay.unwrap_or(0),
        )?)
    } else {
        TrackDecoder::Symphonia(
            symphonia::default::get_codecs()
                .make(&codec_params, &DecoderOptions::default())
                .map_err(|e| DecodeError::Unsupported(format!("codec: {}", e)))?,
        )
    };

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(DecodeError::Unsupported(format!("packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoder = match &mut decoder {
            TrackDecoder::Opus(track) => {
                if let Err(e) = track.decode_into(packet.buf(), &mut samples) {
                    warn!("Skipping corrupt opus packet: {}", e);
                }
                sample_rate = OPUS_SAMPLE_RATE;
                continue;
            }
            TrackDecoder::Symphonia(decoder) => decoder,
        };

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping corrupt audio frame: {}", e);
                continue;
            }
            Err(e) => return Err(DecodeError::Unsupported(format!("decode: {}", e))),
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }
        sample_rate = spec.rate;
        let channels = spec.channels.count().max(1);

        let mut buf = SampleBuffer::<f32>::new(frames as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend(buf.samples().iter().step_by(channels).copied());
    }

    if samples.is_empty() || sample_rate == 0 {
        return Err(DecodeError::Empty);
    }

    debug!(
        "Decoded {} samples at {}Hz ({:.1}s)",
        samples.len(),
        sample_rate,
        samples.len() as f64 / sample_rate as f64
    );

    Ok(DecodedAudio {
        sample_rate,
        samples,
    })
}
