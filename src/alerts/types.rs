//! Alert domain types
//!
//! Defines alert records, their severity, and the display category derived from it.

use crate::error::StreamError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Alert severity as carried on the wire
///
/// Deserialization never fails: unrecognized strings, `null`, non-string
/// values and absent fields all become [`Severity::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    /// Something is broken
    Error,
    /// Attention recommended
    Warning,
    /// Informational, no action needed
    Info,
    /// Missing or unrecognized severity
    #[default]
    Unknown,
}

impl Severity {
    /// Map a wire string to a severity (case-sensitive, as sent by the server)
    pub fn from_wire(value: &str) -> Self {
        match value {
            "error" => Self::Error,
            "warning" => Self::Warning,
            "info" => Self::Info,
            _ => Self::Unknown,
        }
    }

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Unknown => "unknown",
        }
    }

    /// Display category for this severity
    pub fn icon(&self) -> SeverityIcon {
        match self {
            Self::Error => SeverityIcon::Error,
            Self::Warning => SeverityIcon::Warning,
            Self::Info => SeverityIcon::Info,
            Self::Unknown => SeverityIcon::Neutral,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(Value::as_str)
            .map(Severity::from_wire)
            .unwrap_or_default())
    }
}

/// Display category used by the render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityIcon {
    Error,
    Warning,
    Info,
    /// Disabled/neutral icon for anything unrecognized
    Neutral,
}

/// Classify a raw severity value into its display category
///
/// Total: `None`, empty and unrecognized values all map to [`SeverityIcon::Neutral`].
pub fn classify(severity: Option<&str>) -> SeverityIcon {
    severity
        .map(Severity::from_wire)
        .unwrap_or_default()
        .icon()
}

/// A single entry in the alert log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Human-readable description
    pub message: String,
    /// Alert severity
    #[serde(default)]
    pub severity: Severity,
}

impl AlertRecord {
    /// Create a new alert record
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    /// Synthetic record summarizing the batch prediction result
    pub fn from_anomaly_count(count: u64) -> Self {
        Self::new(
            format!("Network anomalies detected: {} counts", count),
            Severity::Warning,
        )
    }

    /// Parse and validate a pushed `alert` payload
    ///
    /// The payload must be a JSON object with a string `message`. Severity
    /// is optional and falls back to [`Severity::Unknown`].
    pub fn from_payload(payload: &str) -> Result<Self, StreamError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| StreamError::MalformedPayload(e.to_string()))?;

        let object = value
            .as_object()
            .ok_or_else(|| StreamError::MalformedPayload("expected a JSON object".to_string()))?;

        let message = match object.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(other) => {
                return Err(StreamError::MalformedPayload(format!(
                    "`message` must be a string, got {}",
                    other
                )))
            }
            None => {
                return Err(StreamError::MalformedPayload(
                    "missing field `message`".to_string(),
                ))
            }
        };

        let severity = object
            .get("severity")
            .and_then(Value::as_str)
            .map(Severity::from_wire)
            .unwrap_or_default();

        Ok(Self { message, severity })
    }
}
