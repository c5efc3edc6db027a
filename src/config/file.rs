//! Configuration file loading
//!
//! Handles loading configuration from TOML files.

use crate::config::Config;
use crate::error::ConfigError;

use std::path::{Path, PathBuf};

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// First existing file among the default locations
    pub fn find_default() -> Option<PathBuf> {
        Self::default_paths().into_iter().find(|path| path.exists())
    }

    /// Get default configuration file paths, highest precedence first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // Current directory
        paths.push(PathBuf::from("netalert.toml"));
        paths.push(PathBuf::from(".netalert.toml"));

        // User config
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("netalert").join("config.toml"));
        }

        // System-wide config
        paths.push(PathBuf::from("/etc/netalert/config.toml"));

        paths
    }
}
