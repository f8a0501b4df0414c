use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Flag raised while a camera/microphone request (or a speech engine handoff)
/// is in flight.
///
/// Permission prompts steal focus and fire the same visibility and fullscreen
/// events a real tab switch does. While the flag is up the session guard
/// ignores those events. Clearing is deferred by a grace period so the burst
/// of focus churn that follows the prompt is absorbed too.
#[derive(Clone)]
pub struct MediaBusyGuard {
    inner: Arc<Inner>,
}

struct Inner {
    busy: AtomicBool,
    /// Bumped on every raise; a scheduled clear only lands if no newer raise happened
    generation: AtomicU64,
    grace: Duration,
}

impl MediaBusyGuard {
    pub fn new(grace: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                busy: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                grace,
            }),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::SeqCst)
    }

    /// Raise immediately, or schedule the flag to drop after the grace period.
    ///
    /// Lowering spawns a timer task and must run inside a tokio runtime.
    pub fn set_busy(&self, busy: bool) {
        if busy {
            self.inner.generation.fetch_add(1, Ordering::SeqCst);
            self.inner.busy.store(true, Ordering::SeqCst);
            debug!("Media busy raised");
            return;
        }

        let scheduled_for = self.inner.generation.load(Ordering::SeqCst);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.grace).await;
            if inner.generation.load(Ordering::SeqCst) == scheduled_for {
                inner.busy.store(false, Ordering::SeqCst);
                debug!("Media busy cleared after grace period");
            }
        });
    }

    /// Run a device request with the flag raised, scheduling the clear once
    /// it resolves whether it succeeded or not.
    pub async fn guard_request<F, T>(&self, request: F) -> T
    where
        F: Future<Output = T>,
    {
        self.set_busy(true);
        let result = request.await;
        self.set_busy(false);
        result
    }
}

impl Default for MediaBusyGuard {
    fn default() -> Self {
        Self::new(Duration::from_millis(1200))
    }
}
