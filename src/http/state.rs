use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, warn};

use crate::guard::{GuardNotice, Viewport};
use crate::interview::InterviewSession;
use crate::recording::{CaptureDevice, DeviceConstraints, DeviceError, DeviceStream};

/// Notices kept for a host that stops polling; older ones are dropped first
pub const MAX_PENDING_NOTICES: usize = 64;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The interview the host shell is driving
    pub session: Arc<InterviewSession>,

    /// Fullscreen state as last reported by the host
    pub viewport: Arc<BridgeViewport>,

    /// Guard notices not yet collected by the host
    pub notices: Arc<Mutex<VecDeque<GuardNotice>>>,
}

impl AppState {
    /// Must run inside a tokio runtime: guard notices are forwarded by a
    /// background task.
    pub fn new(session: Arc<InterviewSession>, viewport: Arc<BridgeViewport>) -> Self {
        let notices = Arc::new(Mutex::new(VecDeque::with_capacity(MAX_PENDING_NOTICES)));

        let mut rx = session.guard().subscribe();
        let buffer = Arc::clone(&notices);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(notice) => {
                        let mut pending = buffer.lock().await;
                        if pending.len() == MAX_PENDING_NOTICES {
                            if let Some(dropped) = pending.pop_front() {
                                debug!(?dropped, "Notice buffer full; dropping oldest");
                            }
                        }
                        pending.push_back(notice);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Guard notices dropped; host is polling too slowly");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            debug!("Guard notice forwarding stopped");
        });

        Self {
            session,
            viewport,
            notices,
        }
    }
}

/// What the guard last asked the host to do with fullscreen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FullscreenRequest {
    Enter,
    Exit,
}

/// `Viewport` for a remote UI shell.
///
/// The shell reports fullscreen changes over HTTP and polls for pending
/// enter/exit requests in the guard status.
#[derive(Debug, Default)]
pub struct BridgeViewport {
    fullscreen: AtomicBool,
    /// 0 = none, 1 = enter, 2 = exit
    request: AtomicU8,
}

impl BridgeViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the host's current fullscreen state, satisfying any request
    /// it fulfils
    pub fn report_fullscreen(&self, in_fullscreen: bool) {
        self.fullscreen.store(in_fullscreen, Ordering::SeqCst);
        let fulfilled = if in_fullscreen { 1 } else { 2 };
        let _ = self
            .request
            .compare_exchange(fulfilled, 0, Ordering::SeqCst, Ordering::SeqCst);
    }

    pub fn pending_request(&self) -> Option<FullscreenRequest> {
        match self.request.load(Ordering::SeqCst) {
            1 => Some(FullscreenRequest::Enter),
            2 => Some(FullscreenRequest::Exit),
            _ => None,
        }
    }
}

impl Viewport for BridgeViewport {
    fn request_fullscreen(&self) {
        self.request.store(1, Ordering::SeqCst);
    }

    fn exit_fullscreen(&self) {
        self.request.store(2, Ordering::SeqCst);
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen.load(Ordering::SeqCst)
    }
}

/// Capture device for bridge mode: the shell owns the real devices and
/// uploads finished recordings, so nothing can be opened locally.
pub struct HostOwnedDevice;

#[async_trait::async_trait]
impl CaptureDevice for HostOwnedDevice {
    async fn open(
        &self,
        constraints: &DeviceConstraints,
    ) -> Result<Box<dyn DeviceStream>, DeviceError> {
        Err(DeviceError::NotFound(constraints.kind))
    }

    fn name(&self) -> &str {
        "host"
    }
}
