use serde::Serialize;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::TimerConfig;
use crate::questions::RoundType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Normal,
    Warning,
    Danger,
}

/// What the countdown display shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerTick {
    pub remaining_seconds: u32,
    pub urgency: Urgency,
}

impl TimerTick {
    fn new(remaining_seconds: u32, config: &TimerConfig) -> Self {
        let urgency = if remaining_seconds <= config.danger_at_secs {
            Urgency::Danger
        } else if remaining_seconds <= config.warning_at_secs {
            Urgency::Warning
        } else {
            Urgency::Normal
        };
        Self {
            remaining_seconds,
            urgency,
        }
    }

    /// "m:ss"
    pub fn display(&self) -> String {
        format!(
            "{}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }
}

/// The single per-page question countdown.
///
/// `start` cancels whatever was running, so two timers never overlap.
pub struct QuestionTimer {
    config: TimerConfig,
    handle: Option<JoinHandle<()>>,
}

impl QuestionTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            handle: None,
        }
    }

    /// Count down from `seconds`, publishing the remaining time immediately
    /// and then once per second. `on_expire` runs once when it reaches zero,
    /// whether or not anyone still holds the receiver.
    pub fn start<F>(&mut self, seconds: u32, on_expire: F) -> watch::Receiver<TimerTick>
    where
        F: FnOnce() + Send + 'static,
    {
        self.clear();

        let config = self.config.clone();
        let (tx, rx) = watch::channel(TimerTick::new(seconds, &config));

        info!("Question timer started: {}s", seconds);

        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // Immediate first tick; the starting value is already published
            interval.tick().await;

            let mut remaining = seconds;
            loop {
                if remaining == 0 {
                    info!("Question timer expired");
                    on_expire();
                    return;
                }

                interval.tick().await;
                remaining -= 1;

                tx.send_replace(TimerTick::new(remaining, &config));
                debug!("Question timer: {}s left", remaining);
            }
        }));

        rx
    }

    /// Safe to call with nothing running
    pub fn clear(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!("Question timer cleared");
            }
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Mcq,
    Open,
}

/// Per-question time limit in seconds for a round
pub fn time_limit_for(round: Option<RoundType>, kind: QuestionKind) -> u32 {
    match (round, kind) {
        (Some(RoundType::Aptitude), QuestionKind::Mcq) => 90,
        (Some(RoundType::Aptitude), QuestionKind::Open) => 120,
        (Some(RoundType::Technical), _) => 600,
        (Some(RoundType::Managerial), _) => 300,
        (Some(RoundType::Hr), _) => 240,
        (_, QuestionKind::Mcq) => 120,
        (_, QuestionKind::Open) => 300,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_thresholds() {
        let config = TimerConfig::default();
        assert_eq!(TimerTick::new(31, &config).urgency, Urgency::Normal);
        assert_eq!(TimerTick::new(30, &config).urgency, Urgency::Warning);
        assert_eq!(TimerTick::new(11, &config).urgency, Urgency::Warning);
        assert_eq!(TimerTick::new(10, &config).urgency, Urgency::Danger);
        assert_eq!(TimerTick::new(0, &config).urgency, Urgency::Danger);
    }

    #[test]
    fn test_display_format() {
        let config = TimerConfig::default();
        assert_eq!(TimerTick::new(240, &config).display(), "4:00");
        assert_eq!(TimerTick::new(65, &config).display(), "1:05");
        assert_eq!(TimerTick::new(0, &config).display(), "0:00");
    }

    #[test]
    fn test_round_time_limits() {
        assert_eq!(time_limit_for(Some(RoundType::Aptitude), QuestionKind::Mcq), 90);
        assert_eq!(time_limit_for(Some(RoundType::Technical), QuestionKind::Open), 600);
        assert_eq!(time_limit_for(Some(RoundType::Hr), QuestionKind::Open), 240);
        assert_eq!(time_limit_for(Some(RoundType::Coding), QuestionKind::Mcq), 120);
        assert_eq!(time_limit_for(None, QuestionKind::Open), 300);
    }
}
