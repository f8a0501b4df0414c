use anyhow::{Context, Result};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::device::{CaptureDevice, DeviceConstraints, DeviceError, DeviceStream, EncodedChunk};
use crate::audio::{mime_type_for_path, CompressedAudio};

/// Plays a pre-recorded compressed file back as if it were a live
/// microphone, one `chunk_size` slice per timeslice.
///
/// Used by the `transcode` command and anywhere a real device is not at
/// hand. Opens and releases are counted so leaks are visible.
pub struct ReplayDevice {
    name: String,
    audio: Arc<Vec<u8>>,
    mime_type: String,
    chunk_size: usize,
    opened: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl ReplayDevice {
    pub fn new(audio: CompressedAudio, chunk_size: usize) -> Self {
        Self {
            name: "replay".to_string(),
            audio: Arc::new(audio.data),
            mime_type: audio.mime_type,
            chunk_size: chunk_size.max(1),
            opened: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Load a file, guessing the container from its extension
    pub fn from_file(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read audio file: {}", path.display()))?;

        let mime_type = mime_type_for_path(path);

        info!("Replaying {} ({} bytes, {})", path.display(), data.len(), mime_type);

        let mut device = Self::new(CompressedAudio::new(data, mime_type), chunk_size);
        device.name = path.display().to_string();
        Ok(device)
    }

    pub fn opened_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CaptureDevice for ReplayDevice {
    async fn open(
        &self,
        constraints: &DeviceConstraints,
    ) -> Result<Box<dyn DeviceStream>, DeviceError> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        debug!("Replay device opened as {:?}", constraints.kind);
        Ok(Box::new(ReplayStream {
            audio: Arc::clone(&self.audio),
            mime_type: self.mime_type.clone(),
            chunk_size: self.chunk_size,
            released: Arc::clone(&self.released),
            is_released: false,
            stop_tx: None,
            task: None,
        }))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

struct ReplayStream {
    audio: Arc<Vec<u8>>,
    mime_type: String,
    chunk_size: usize,
    released: Arc<AtomicUsize>,
    is_released: bool,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

#[async_trait::async_trait]
impl DeviceStream for ReplayStream {
    fn start_recorder(
        &mut self,
        timeslice: Duration,
    ) -> Result<mpsc::Receiver<EncodedChunk>, DeviceError> {
        if self.is_released {
            return Err(DeviceError::RecorderFailed("stream already released".to_string()));
        }
        if self.task.is_some() {
            return Err(DeviceError::RecorderFailed("recorder already running".to_string()));
        }

        let (tx, rx) = mpsc::channel(64);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let audio = Arc::clone(&self.audio);
        let chunk_size = self.chunk_size;

        self.stop_tx = Some(stop_tx);
        self.task = Some(tokio::spawn(async move {
            let started = tokio::time::Instant::now();
            let mut interval = tokio::time::interval(timeslice);
            interval.tick().await;

            let mut offset = 0;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick(), if offset < audio.len() => {
                        let end = (offset + chunk_size).min(audio.len());
                        let chunk = EncodedChunk {
                            data: audio[offset..end].to_vec(),
                            timestamp_ms: started.elapsed().as_millis() as u64,
                        };
                        offset = end;
                        if tx.send(chunk).await.is_err() {
                            return;
                        }
                    }
                }
            }

            // Final slice on stop, like a recorder flushing its buffer
            if offset < audio.len() {
                let _ = tx
                    .send(EncodedChunk {
                        data: audio[offset..].to_vec(),
                        timestamp_ms: started.elapsed().as_millis() as u64,
                    })
                    .await;
            }
        }));

        Ok(rx)
    }

    async fn stop_recorder(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    fn release(&mut self) {
        if self.is_released {
            return;
        }
        self.is_released = true;
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    fn mime_type(&self) -> &str {
        &self.mime_type
    }
}
