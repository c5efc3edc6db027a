//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;

use std::path::PathBuf;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must load. Without one the first existing default
    /// location is used, and having none is not an error.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => Some(PathBuf::from(path)),
            None => ConfigFile::find_default(),
        };

        if let Some(path) = path {
            let mut cfg = ConfigFile::load(&path)?;
            cfg.source = Some(path);
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override with CLI prediction API URL
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(u) = url {
            self.config.endpoints.api_url = u;
        }
        self
    }

    /// Override with CLI stream URL
    pub fn with_stream_url(mut self, url: Option<String>) -> Self {
        if let Some(u) = url {
            self.config.endpoints.stream_url = u;
        }
        self
    }

    /// Override with CLI request timeout
    pub fn with_timeout(mut self, secs: Option<u64>) -> Self {
        if let Some(s) = secs {
            self.config.general.request_timeout_secs = s;
        }
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
