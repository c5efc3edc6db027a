//! Unified error types for netalert
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the prediction API
    #[error("Prediction fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Error from the alert stream transport
    #[error("Alert stream error: {0}")]
    Stream(#[from] StreamError),

    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The monitor task is no longer running
    #[error("Alert monitor has shut down")]
    MonitorClosed,

    /// Failed to serialize command output
    #[error("Output serialization failed: {0}")]
    Output(#[from] serde_json::Error),

    /// IO error (terminal, file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the bootstrap prediction request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network or connection failure
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Server answered with a non-2xx status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body did not match the expected shape
    #[error("malformed prediction response: {0}")]
    Decode(String),
}

/// Errors from the push channel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Failed to open the event stream
    #[error("failed to connect to {url}: {message}")]
    Connect { url: String, message: String },

    /// Connection dropped while reading events
    #[error("stream disconnected: {0}")]
    Disconnected(String),

    /// Pushed payload was not a valid alert record
    #[error("malformed alert payload: {0}")]
    MalformedPayload(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
