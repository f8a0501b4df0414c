use std::time::Duration;
use tokio::sync::mpsc;

/// Media device kind requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Microphone input
    Microphone,
    /// Camera (video preview only, never recorded)
    Camera,
}

/// What the host is asked to open
#[derive(Debug, Clone)]
pub struct DeviceConstraints {
    pub kind: DeviceKind,
    /// Preferred container, first supported wins (e.g. "audio/webm", "audio/ogg")
    pub preferred_mime_types: Vec<String>,
}

impl DeviceConstraints {
    pub fn microphone() -> Self {
        Self {
            kind: DeviceKind::Microphone,
            preferred_mime_types: vec!["audio/webm".to_string(), "audio/ogg".to_string()],
        }
    }

    pub fn camera() -> Self {
        Self {
            kind: DeviceKind::Camera,
            preferred_mime_types: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceError {
    #[error("device access denied: {0}")]
    AccessDenied(String),
    #[error("no {0:?} device available")]
    NotFound(DeviceKind),
    #[error("recorder failed to start: {0}")]
    RecorderFailed(String),
    #[error("interview has ended")]
    SessionEnded,
}

/// One slice of compressed audio as emitted by the recorder
#[derive(Debug, Clone)]
pub struct EncodedChunk {
    pub data: Vec<u8>,
    /// Milliseconds since the recorder started
    pub timestamp_ms: u64,
}

/// Host media-device access (the `getUserMedia` side of the browser).
///
/// Implementations:
/// - a browser bridge feeding real MediaRecorder slices
/// - in-memory fakes for tests
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Open a device. May block on a user permission prompt.
    async fn open(&self, constraints: &DeviceConstraints)
        -> Result<Box<dyn DeviceStream>, DeviceError>;

    /// Device name for logging
    fn name(&self) -> &str;
}

/// An open device handle plus its recorder.
///
/// Every stream handed out by `CaptureDevice::open` must be released exactly
/// once; `RecordingSession` and `InterviewSession` take care of that.
#[async_trait::async_trait]
pub trait DeviceStream: Send {
    /// Begin recording, emitting a chunk every `timeslice`.
    ///
    /// Chunks arrive in capture order on the returned channel, which closes
    /// after `stop_recorder` has flushed the final slice.
    fn start_recorder(&mut self, timeslice: Duration)
        -> Result<mpsc::Receiver<EncodedChunk>, DeviceError>;

    /// Flush the last slice and close the chunk channel
    async fn stop_recorder(&mut self);

    /// Stop all tracks and give the device back to the host
    fn release(&mut self);

    /// Container of the emitted chunks
    fn mime_type(&self) -> &str;
}
