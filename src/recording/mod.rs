//! Per-question audio capture
//!
//! `CaptureDevice`/`DeviceStream` abstract the host's media devices and
//! recorder; `RecordingSession` owns one recording from start to stop.

mod device;
mod replay;
mod session;

pub use device::{
    CaptureDevice, DeviceConstraints, DeviceError, DeviceKind, DeviceStream, EncodedChunk,
};
pub use replay::ReplayDevice;
pub use session::RecordingSession;
