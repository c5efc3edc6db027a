//! netalert - network anomaly alert monitor library
//!
//! Merges a one-shot prediction result with a live stream of pushed alerts
//! into a single ordered alert log, and drives a transient notification for
//! the most recent alert.
//!
//! # Modules
//!
//! - [`alerts`]: Alert log, notification state machine and board reducer
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`error`]: Error types
//! - [`logging`]: Logger setup
//! - [`services`]: Monitor lifecycle
//! - [`sources`]: Prediction API and alert stream clients

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod services;
pub mod sources;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
