use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::device::{CaptureDevice, DeviceConstraints, DeviceError, DeviceStream};
use crate::audio::CompressedAudio;
use crate::guard::MediaBusyGuard;

/// An active per-question recording.
///
/// Holding a `RecordingSession` means a recording is running; `stop`
/// consumes it. Whoever owns the slot (`Option<RecordingSession>`) cannot
/// start a second one without first taking the first out.
pub struct RecordingSession {
    id: Uuid,
    question_index: usize,
    started_at: DateTime<Utc>,
    started: tokio::time::Instant,
    mime_type: String,

    /// Device handle, `None` once released
    stream: Option<Box<dyn DeviceStream>>,

    /// Appends slices in arrival order; yields them when the recorder closes
    collector: Option<JoinHandle<Vec<Vec<u8>>>>,

    /// Drives the live "0:12" display
    ticker: JoinHandle<()>,

    elapsed_seconds: Arc<AtomicU64>,
    chunk_count: Arc<AtomicUsize>,
}

impl RecordingSession {
    /// Open the microphone and start buffering slices.
    ///
    /// The device request runs under the media-busy flag so its permission
    /// prompt does not trip the session guard. On failure nothing is left
    /// open; callers should offer a retry.
    pub async fn start(
        device: &dyn CaptureDevice,
        constraints: &DeviceConstraints,
        busy: &MediaBusyGuard,
        question_index: usize,
        timeslice: Duration,
    ) -> Result<Self, DeviceError> {
        let id = Uuid::new_v4();
        info!(
            "Starting recording {} for question {} on {}",
            id,
            question_index,
            device.name()
        );

        let mut stream = busy
            .guard_request(device.open(constraints))
            .await
            .inspect_err(|e| warn!("Microphone unavailable: {}", e))?;

        let mut chunk_rx = match stream.start_recorder(timeslice) {
            Ok(rx) => rx,
            Err(e) => {
                error!("Recorder failed to start: {}", e);
                stream.release();
                return Err(e);
            }
        };

        let chunk_count = Arc::new(AtomicUsize::new(0));
        let collector = {
            let chunk_count = Arc::clone(&chunk_count);
            tokio::spawn(async move {
                let mut chunks = Vec::new();
                while let Some(chunk) = chunk_rx.recv().await {
                    if chunk.data.is_empty() {
                        continue;
                    }
                    chunks.push(chunk.data);
                    chunk_count.fetch_add(1, Ordering::SeqCst);
                }
                chunks
            })
        };

        let elapsed_seconds = Arc::new(AtomicU64::new(0));
        let ticker = {
            let elapsed_seconds = Arc::clone(&elapsed_seconds);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(Duration::from_secs(1));
                // First tick fires immediately
                interval.tick().await;
                loop {
                    interval.tick().await;
                    let secs = elapsed_seconds.fetch_add(1, Ordering::SeqCst) + 1;
                    debug!("Recording elapsed: {}s", secs);
                }
            })
        };

        Ok(Self {
            id,
            question_index,
            started_at: Utc::now(),
            started: tokio::time::Instant::now(),
            mime_type: stream.mime_type().to_string(),
            stream: Some(stream),
            collector: Some(collector),
            ticker,
            elapsed_seconds,
            chunk_count,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Whole seconds shown on the live timer
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds.load(Ordering::SeqCst)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count.load(Ordering::SeqCst)
    }

    /// Finalize the recorder, release the device and join the slices in
    /// capture order.
    pub async fn stop(mut self) -> CompressedAudio {
        self.ticker.abort();

        if let Some(mut stream) = self.stream.take() {
            stream.stop_recorder().await;
            stream.release();
        }

        let chunks = match self.collector.take() {
            Some(collector) => match collector.await {
                Ok(chunks) => chunks,
                Err(e) => {
                    error!("Chunk collector panicked: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let audio = CompressedAudio::new(chunks.concat(), self.mime_type.clone());
        info!(
            "Recording {} stopped after {:.1}s ({} chunks, {} bytes)",
            self.id,
            self.started.elapsed().as_secs_f64(),
            chunks.len(),
            audio.data.len()
        );

        audio
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.ticker.abort();
        if let Some(collector) = self.collector.take() {
            collector.abort();
        }
        if let Some(mut stream) = self.stream.take() {
            warn!("Recording {} dropped without stop; releasing device", self.id);
            stream.release();
        }
    }
}
