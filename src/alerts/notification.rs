//! Transient "most recent alert" notification
//!
//! A two-state machine (`Hidden`, `Visible`) that is independent of the
//! alert log. Showing a new message always replaces the current one and
//! restarts the auto-hide countdown; there is never more than one pending
//! notification.

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// How long a notification stays visible without a newer alert
pub const AUTO_HIDE_AFTER: Duration = Duration::from_millis(6000);

/// Notification state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NotificationState {
    /// Nothing shown
    Hidden,
    /// The message is on screen until `expires_at`
    Visible { expires_at: Instant },
}

/// Render-facing notification snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub visible: bool,
    pub message: String,
}

/// Drives the notification lifecycle
#[derive(Debug, Clone)]
pub struct NotificationDriver {
    state: NotificationState,
    auto_hide: Duration,
    /// Message of the last shown notification, kept after hiding
    message: String,
}

impl NotificationDriver {
    /// Create a hidden driver with the default auto-hide timeout
    pub fn new() -> Self {
        Self::with_auto_hide(AUTO_HIDE_AFTER)
    }

    /// Create a hidden driver with a custom auto-hide timeout
    pub fn with_auto_hide(auto_hide: Duration) -> Self {
        Self {
            state: NotificationState::Hidden,
            auto_hide,
            message: String::new(),
        }
    }

    /// Show `message`, superseding anything currently visible
    pub fn show(&mut self, message: impl Into<String>, now: Instant) {
        self.message = message.into();
        self.state = NotificationState::Visible {
            expires_at: now + self.auto_hide,
        };
    }

    /// Hide on explicit user request
    pub fn dismiss(&mut self) {
        self.state = NotificationState::Hidden;
    }

    /// Hide if the countdown of the current notification has elapsed
    ///
    /// Returns `true` if this call hid the notification.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.state {
            NotificationState::Visible { expires_at } if now >= expires_at => {
                self.state = NotificationState::Hidden;
                true
            }
            _ => false,
        }
    }

    /// The single outstanding hide deadline, if visible
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            NotificationState::Visible { expires_at } => Some(expires_at),
            NotificationState::Hidden => None,
        }
    }

    /// Whether a notification is currently shown
    pub fn is_visible(&self) -> bool {
        matches!(self.state, NotificationState::Visible { .. })
    }

    /// Snapshot for rendering
    pub fn snapshot(&self) -> Notification {
        Notification {
            visible: self.is_visible(),
            message: self.message.clone(),
        }
    }
}

impl Default for NotificationDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initially_hidden() {
        let driver = NotificationDriver::new();
        assert!(!driver.is_visible());
        assert!(driver.deadline().is_none());
        assert_eq!(driver.snapshot(), Notification::default());
    }

    #[test]
    fn test_show_sets_deadline() {
        let now = Instant::now();
        let mut driver = NotificationDriver::new();
        driver.show("Port scan", now);

        assert!(driver.is_visible());
        assert_eq!(driver.deadline(), Some(now + AUTO_HIDE_AFTER));
        assert_eq!(driver.snapshot().message, "Port scan");
    }

    #[test]
    fn test_expire_before_deadline_is_noop() {
        let now = Instant::now();
        let mut driver = NotificationDriver::new();
        driver.show("Port scan", now);

        assert!(!driver.expire(now + Duration::from_millis(5999)));
        assert!(driver.is_visible());

        assert!(driver.expire(now + Duration::from_millis(6000)));
        assert!(!driver.is_visible());
    }

    #[test]
    fn test_new_alert_restarts_countdown() {
        let start = Instant::now();
        let mut driver = NotificationDriver::new();
        driver.show("Port scan", start);

        let second = start + Duration::from_millis(3000);
        driver.show("High latency", second);

        // The first notification's deadline no longer hides anything
        assert!(!driver.expire(start + Duration::from_millis(6000)));
        assert!(driver.is_visible());
        assert_eq!(driver.snapshot().message, "High latency");

        assert!(driver.expire(second + AUTO_HIDE_AFTER));
        assert!(!driver.is_visible());
    }

    #[test]
    fn test_dismiss_hides_and_keeps_message() {
        let now = Instant::now();
        let mut driver = NotificationDriver::new();
        driver.show("Port scan", now);
        driver.dismiss();

        let snapshot = driver.snapshot();
        assert!(!snapshot.visible);
        assert_eq!(snapshot.message, "Port scan");
        assert!(driver.deadline().is_none());
        assert!(!driver.expire(now + AUTO_HIDE_AFTER));
    }

    #[test]
    fn test_custom_auto_hide() {
        let now = Instant::now();
        let mut driver = NotificationDriver::with_auto_hide(Duration::from_secs(1));
        driver.show("short", now);
        assert_eq!(driver.deadline(), Some(now + Duration::from_secs(1)));
    }
}
