//! Alert log and notification state
//!
//! Merges the bootstrap prediction result and the live alert stream into one
//! ordered log, and drives the transient "most recent alert" notification.

mod alert_log;
mod board;
mod notification;
mod types;

pub use alert_log::AlertLog;
pub use board::{AlertBoard, AlertView, BoardEvent};
pub use notification::{Notification, NotificationDriver, AUTO_HIDE_AFTER};
pub use types::{classify, AlertRecord, Severity, SeverityIcon};
