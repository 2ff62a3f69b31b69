//! Transient notifications: enter after a short delay, stay visible, exit,
//! then disappear. Several can be on screen at once.

use std::time::{Duration, Instant};

use crate::config::NotificationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Lifecycle phase of a notification at a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Created, not shown yet
    Entering,
    Visible,
    /// Leaving; progress 0..=1
    Exiting(f32),
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationTiming {
    pub enter_delay: Duration,
    pub visible_until: Duration,
    pub exit: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self::from_config(&NotificationConfig::default())
    }
}

impl NotificationTiming {
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self {
            enter_delay: Duration::from_millis(config.enter_delay_ms),
            visible_until: Duration::from_millis(config.visible_ms),
            exit: Duration::from_millis(config.exit_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub created: Instant,
}

impl Notification {
    pub fn phase(&self, now: Instant, timing: &NotificationTiming) -> Phase {
        let age = now.saturating_duration_since(self.created);
        if age < timing.enter_delay {
            Phase::Entering
        } else if age < timing.visible_until {
            Phase::Visible
        } else if age < timing.visible_until + timing.exit {
            let into_exit = (age - timing.visible_until).as_secs_f32();
            Phase::Exiting(into_exit / timing.exit.as_secs_f32())
        } else {
            Phase::Expired
        }
    }
}

/// Stack of active notifications, oldest first.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    timing: NotificationTiming,
}

impl NotificationCenter {
    pub fn new(timing: NotificationTiming) -> Self {
        Self {
            items: Vec::new(),
            timing,
        }
    }

    pub fn timing(&self) -> &NotificationTiming {
        &self.timing
    }

    pub fn push_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        let message = message.into();
        match severity {
            Severity::Error => log::warn!("notify.error msg={}", message),
            _ => log::info!("notify.{:?} msg={}", severity, message),
        }
        self.items.push(Notification {
            message,
            severity,
            created: now,
        });
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity) {
        self.push_at(message, severity, Instant::now());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, Severity::Error);
    }

    /// Drop expired notifications. Returns true if any were removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        let timing = self.timing;
        self.items
            .retain(|n| n.phase(now, &timing) != Phase::Expired);
        self.items.len() != before
    }

    /// Notifications to draw now, with their phase (entering ones are hidden).
    pub fn visible(&self, now: Instant) -> Vec<(&Notification, Phase)> {
        self.items
            .iter()
            .map(|n| (n, n.phase(now, &self.timing)))
            .filter(|(_, p)| matches!(p, Phase::Visible | Phase::Exiting(_)))
            .collect()
    }

    /// All live notifications, including ones still entering.
    pub fn all(&self) -> &[Notification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(|n| n.message.as_str()).collect()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_boundaries() {
        let t0 = Instant::now();
        let timing = NotificationTiming::default();
        let n = Notification {
            message: "File uploaded successfully!".to_string(),
            severity: Severity::Success,
            created: t0,
        };
        let at = |ms| t0 + Duration::from_millis(ms);
        assert_eq!(n.phase(at(0), &timing), Phase::Entering);
        assert_eq!(n.phase(at(99), &timing), Phase::Entering);
        assert_eq!(n.phase(at(100), &timing), Phase::Visible);
        assert_eq!(n.phase(at(2999), &timing), Phase::Visible);
        assert!(matches!(n.phase(at(3150), &timing), Phase::Exiting(p) if (p - 0.5).abs() < 0.01));
        assert_eq!(n.phase(at(3300), &timing), Phase::Expired);
    }

    #[test]
    fn test_stacking_and_prune() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::default();
        center.push_at("first", Severity::Info, t0);
        center.push_at("second", Severity::Error, t0 + Duration::from_millis(1000));

        let shown = center.visible(t0 + Duration::from_millis(1200));
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[1].0.message, "second");

        assert!(center.prune(t0 + Duration::from_millis(3400)));
        assert_eq!(center.messages(), vec!["second"]);
        assert!(!center.prune(t0 + Duration::from_millis(3500)));

        center.prune(t0 + Duration::from_millis(4400));
        assert!(center.is_empty());
    }

    #[test]
    fn test_entering_not_visible() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::default();
        center.push_at("hello", Severity::Success, t0);
        assert!(center.visible(t0).is_empty());
        assert_eq!(center.all().len(), 1);
    }

    #[test]
    fn test_timing_from_config() {
        let config = NotificationConfig {
            enter_delay_ms: 0,
            visible_ms: 500,
            exit_ms: 100,
        };
        let timing = NotificationTiming::from_config(&config);
        assert_eq!(timing.visible_until, Duration::from_millis(500));
        assert_eq!(timing.exit, Duration::from_millis(100));
    }
}
