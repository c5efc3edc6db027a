//! Alert board
//!
//! Single-writer reducer that owns the alert log, the loading flag and the
//! notification driver. Every mutation goes through [`AlertBoard::apply`].

use super::alert_log::AlertLog;
use super::notification::{Notification, NotificationDriver};
use super::types::AlertRecord;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Inbound events, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// Bootstrap fetch succeeded with an aggregate anomaly count
    PredictionsLoaded(u64),
    /// Bootstrap fetch failed
    PredictionsFailed(String),
    /// A validated alert arrived on the stream
    AlertReceived(AlertRecord),
    /// A pushed payload failed validation and was quarantined
    PayloadRejected(String),
    /// Operator dismissed the notification
    DismissNotification,
    /// The auto-hide timer fired
    HideDue,
}

/// Render surface snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertView {
    pub alerts: Vec<AlertRecord>,
    pub is_loading: bool,
    pub notification: Notification,
    pub rejected_payloads: usize,
}

/// Alert board state
#[derive(Debug, Clone)]
pub struct AlertBoard {
    log: AlertLog,
    loading: bool,
    notification: NotificationDriver,
    rejected_payloads: usize,
    revision: u64,
}

impl AlertBoard {
    /// Create an empty board in the loading state
    pub fn new() -> Self {
        Self::with_notification(NotificationDriver::new())
    }

    /// Create a board with a custom auto-hide timeout
    pub fn with_auto_hide(auto_hide: Duration) -> Self {
        Self::with_notification(NotificationDriver::with_auto_hide(auto_hide))
    }

    fn with_notification(notification: NotificationDriver) -> Self {
        Self {
            log: AlertLog::new(),
            loading: true,
            notification,
            rejected_payloads: 0,
            revision: 0,
        }
    }

    /// Apply an event at time `now`
    ///
    /// Returns `true` if the rendered state changed.
    pub fn apply(&mut self, event: BoardEvent, now: Instant) -> bool {
        let changed = match event {
            BoardEvent::PredictionsLoaded(count) => {
                let settled = self.settle_loading();
                if settled {
                    self.append(AlertRecord::from_anomaly_count(count), now);
                }
                settled
            }
            BoardEvent::PredictionsFailed(reason) => {
                let settled = self.settle_loading();
                if settled {
                    log::error!("Error fetching alerts: {}", reason);
                }
                settled
            }
            BoardEvent::AlertReceived(record) => {
                self.append(record, now);
                true
            }
            BoardEvent::PayloadRejected(reason) => {
                self.rejected_payloads += 1;
                log::warn!("Dropping malformed alert payload: {}", reason);
                true
            }
            BoardEvent::DismissNotification => {
                let visible = self.notification.is_visible();
                self.notification.dismiss();
                visible
            }
            BoardEvent::HideDue => {
                let hidden = self.notification.expire(now);
                if hidden {
                    log::debug!("Notification auto-hidden");
                }
                hidden
            }
        };

        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Clear the loading flag. Returns `false` if it was already cleared.
    fn settle_loading(&mut self) -> bool {
        if !self.loading {
            log::debug!("Ignoring duplicate prediction result");
            return false;
        }
        self.loading = false;
        true
    }

    fn append(&mut self, record: AlertRecord, now: Instant) {
        log::info!("[{}] {}", record.severity, record.message);
        self.notification.show(record.message.clone(), now);
        self.log.append(record);
    }

    /// The alert log
    pub fn alerts(&self) -> &AlertLog {
        &self.log
    }

    /// Whether the bootstrap fetch is still outstanding
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The notification driver
    pub fn notification(&self) -> &NotificationDriver {
        &self.notification
    }

    /// Pending auto-hide deadline, if a notification is visible
    pub fn deadline(&self) -> Option<Instant> {
        self.notification.deadline()
    }

    /// Number of stream payloads dropped by validation
    pub fn rejected_payloads(&self) -> usize {
        self.rejected_payloads
    }

    /// Number of state changes applied so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Snapshot for rendering
    pub fn view(&self) -> AlertView {
        AlertView {
            alerts: self.log.as_slice().to_vec(),
            is_loading: self.loading,
            notification: self.notification.snapshot(),
            rejected_payloads: self.rejected_payloads,
        }
    }
}

impl Default for AlertBoard {
    fn default() -> Self {
        Self::new()
    }
}
