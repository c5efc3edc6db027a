//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Collaborator endpoints
    pub endpoints: EndpointConfig,
    /// File the settings were read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Check every value that the runtime depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("endpoints.api_url", &self.endpoints.api_url)?;
        validate_url("endpoints.stream_url", &self.endpoints.stream_url)?;

        if self.general.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "general.request_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Timeout for the prediction request and for connecting to the stream
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.general.request_timeout_secs)
    }
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{}' is not a valid URL: {}", value, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("unsupported scheme '{}' (expected http or https)", other),
        }),
    }
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            request_timeout_secs: 10,
        }
    }
}

/// Addresses of the prediction API and the alert stream
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Base URL of the prediction API (`/get-predictions` is appended)
    pub api_url: String,
    /// Full URL of the server-sent alert stream
    pub stream_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            stream_url: "http://localhost:3001/events".to_string(),
        }
    }
}
