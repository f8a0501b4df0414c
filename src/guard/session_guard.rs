use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::media_busy::MediaBusyGuard;
use crate::config::GuardConfig;

/// Host-side control over the fullscreen state of the interview window
pub trait Viewport: Send + Sync {
    fn request_fullscreen(&self);
    fn exit_fullscreen(&self);
    fn is_fullscreen(&self) -> bool;
}

/// Pages of the client. Only the interview pages arm the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Companies,
    Company,
    Dashboard,
    Blog,
    Mock,
    Hr,
    Round,
}

impl Page {
    pub fn is_interview(self) -> bool {
        matches!(self, Page::Mock | Page::Hr | Page::Round)
    }
}

/// Advisory UI state raised by the guard. Nothing here blocks the interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardNotice {
    BannerShown,
    BannerHidden,
    TabSwitchWarning { count: u32 },
    ResumeFullscreenPrompt,
    WarningsDismissed,
}

/// Snapshot served to the UI shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardStatus {
    pub active: bool,
    pub media_busy: bool,
    pub hidden: bool,
    pub tab_switch_warnings: u32,
}

enum GuardState {
    Inactive,
    Active(ActiveGuard),
}

#[derive(Default)]
struct ActiveGuard {
    hidden_since: Option<Instant>,
    tab_switch_warnings: u32,
    fullscreen_exit_timer: Option<JoinHandle<()>>,
}

/// Fullscreen enforcement and tab-switch detection for interview pages.
///
/// `Inactive -> Active` happens on navigation to an interview page and
/// `Active -> Inactive` on navigation away. Leaving fullscreen while active
/// never changes state; it only raises a resume prompt. Events arriving while
/// the guard is inactive have nowhere to go, so warnings cannot be raised then.
#[derive(Clone)]
pub struct SessionGuard {
    state: Arc<Mutex<GuardState>>,
    busy: MediaBusyGuard,
    viewport: Arc<dyn Viewport>,
    config: GuardConfig,
    notices: broadcast::Sender<GuardNotice>,
}

impl SessionGuard {
    pub fn new(config: GuardConfig, busy: MediaBusyGuard, viewport: Arc<dyn Viewport>) -> Self {
        let (notices, _) = broadcast::channel(32);
        Self {
            state: Arc::new(Mutex::new(GuardState::Inactive)),
            busy,
            viewport,
            config,
            notices,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GuardNotice> {
        self.notices.subscribe()
    }

    pub fn media_busy(&self) -> &MediaBusyGuard {
        &self.busy
    }

    pub async fn is_active(&self) -> bool {
        matches!(*self.state.lock().await, GuardState::Active(_))
    }

    pub async fn tab_switch_warnings(&self) -> u32 {
        match &*self.state.lock().await {
            GuardState::Active(active) => active.tab_switch_warnings,
            GuardState::Inactive => 0,
        }
    }

    pub async fn status(&self) -> GuardStatus {
        let state = self.state.lock().await;
        let (active, hidden, tab_switch_warnings) = match &*state {
            GuardState::Active(a) => (true, a.hidden_since.is_some(), a.tab_switch_warnings),
            GuardState::Inactive => (false, false, 0),
        };
        GuardStatus {
            active,
            media_busy: self.busy.is_busy(),
            hidden,
            tab_switch_warnings,
        }
    }

    /// Page navigation is the only thing that moves the state machine.
    pub async fn on_navigate(&self, page: Page) {
        if page.is_interview() {
            self.enter().await;
        } else {
            self.leave().await;
        }
    }

    async fn enter(&self) {
        let mut state = self.state.lock().await;
        if let GuardState::Active(active) = &mut *state {
            // Moving between interview pages restarts the count
            cancel_timer(active);
        }
        *state = GuardState::Active(ActiveGuard::default());
        drop(state);

        info!("Interview guard armed");
        self.notify(GuardNotice::BannerShown);
        self.viewport.request_fullscreen();
    }

    /// Unconditionally drop back to inactive: warnings reset, banners hidden,
    /// pending debounce cancelled.
    pub async fn leave(&self) {
        let mut state = self.state.lock().await;
        let was_active = match &mut *state {
            GuardState::Active(active) => {
                cancel_timer(active);
                info!(
                    warnings = active.tab_switch_warnings,
                    "Interview guard disarmed"
                );
                true
            }
            GuardState::Inactive => false,
        };
        *state = GuardState::Inactive;
        drop(state);

        if was_active {
            self.notify(GuardNotice::WarningsDismissed);
            self.notify(GuardNotice::BannerHidden);
            if self.viewport.is_fullscreen() {
                self.viewport.exit_fullscreen();
            }
        }
    }

    pub async fn on_visibility_change(&self, hidden: bool) {
        let mut state = self.state.lock().await;
        let GuardState::Active(active) = &mut *state else {
            return;
        };

        if hidden {
            if self.busy.is_busy() {
                debug!("Page hidden during media request; ignored");
                return;
            }
            active.hidden_since = Some(Instant::now());
            return;
        }

        let Some(hidden_since) = active.hidden_since.take() else {
            return;
        };
        if self.busy.is_busy() {
            debug!("Page visible again during media request; ignored");
            return;
        }

        let hidden_for = hidden_since.elapsed();
        if hidden_for <= self.config.tab_switch_threshold() {
            debug!(hidden_ms = hidden_for.as_millis() as u64, "Short hide treated as noise");
            return;
        }

        active.tab_switch_warnings += 1;
        let count = active.tab_switch_warnings;
        drop(state);

        warn!(
            count,
            hidden_ms = hidden_for.as_millis() as u64,
            "Tab switch detected"
        );
        self.notify(GuardNotice::TabSwitchWarning { count });
    }

    /// Debounced: repeated changes inside the window restart it, and a
    /// return to fullscreen before it fires suppresses the prompt.
    pub async fn on_fullscreen_change(&self) {
        if self.busy.is_busy() {
            debug!("Fullscreen change during media request; ignored");
            return;
        }

        let mut state = self.state.lock().await;
        let GuardState::Active(active) = &mut *state else {
            return;
        };
        cancel_timer(active);

        let guard = self.clone();
        let debounce = self.config.fullscreen_debounce();
        active.fullscreen_exit_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            guard.fullscreen_settled().await;
        }));
    }

    async fn fullscreen_settled(&self) {
        let mut state = self.state.lock().await;
        let GuardState::Active(active) = &mut *state else {
            return;
        };
        // This task is finishing; dropping its own handle just detaches it
        active.fullscreen_exit_timer = None;
        drop(state);

        if self.viewport.is_fullscreen() || self.busy.is_busy() {
            debug!("Fullscreen change was transient");
            return;
        }

        warn!("Fullscreen exited during interview");
        self.notify(GuardNotice::ResumeFullscreenPrompt);
    }

    /// Hide the warning overlays and, if still armed, go back to fullscreen.
    pub async fn resume_fullscreen(&self) {
        self.notify(GuardNotice::WarningsDismissed);
        if self.is_active().await {
            self.viewport.request_fullscreen();
        }
    }

    fn notify(&self, notice: GuardNotice) {
        // No subscribers is fine: the notices are advisory
        let _ = self.notices.send(notice);
    }
}

fn cancel_timer(active: &mut ActiveGuard) {
    if let Some(timer) = active.fullscreen_exit_timer.take() {
        timer.abort();
    }
}
