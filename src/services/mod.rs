//! Service layer
//!
//! Services tie the alert state to its external collaborators and own the
//! component lifecycle.

pub mod monitor;

pub use monitor::{AlertMonitor, MonitorHandle, MonitorSettings, ALERT_EVENT};
