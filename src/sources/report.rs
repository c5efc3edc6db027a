//! Prediction API response model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `GET /get-predictions`
///
/// Only `anomaly_data.abnormal` is required. Extra fields the server adds
/// (such as `additional_metrics`) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Normal/abnormal record counts
    pub anomaly_data: AnomalyData,
    /// Records per protocol (TCP/UDP/ICMP)
    #[serde(default)]
    pub protocol_counts: BTreeMap<String, u64>,
}

impl PredictionReport {
    /// Number of records classified as anomalous
    pub fn abnormal(&self) -> u64 {
        self.anomaly_data.abnormal
    }

    /// Total classified records
    pub fn total(&self) -> u64 {
        self.anomaly_data.normal.saturating_add(self.anomaly_data.abnormal)
    }
}

/// Anomaly classification counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnomalyData {
    #[serde(default)]
    pub normal: u64,
    pub abnormal: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let body = r#"{
            "protocol_counts": {"TCP": 120, "UDP": 30, "ICMP": 4},
            "anomaly_data": {"normal": 140, "abnormal": 14},
            "additional_metrics": {"duration": [0, 2], "src_bytes": [491, 146], "dst_bytes": [0, 0]}
        }"#;

        let report: PredictionReport = serde_json::from_str(body).unwrap();
        assert_eq!(report.abnormal(), 14);
        assert_eq!(report.total(), 154);
        assert_eq!(report.protocol_counts.get("TCP"), Some(&120));
    }

    #[test]
    fn test_parse_minimal_response() {
        let report: PredictionReport =
            serde_json::from_str(r#"{"anomaly_data": {"abnormal": 7}}"#).unwrap();
        assert_eq!(report.abnormal(), 7);
        assert_eq!(report.anomaly_data.normal, 0);
        assert!(report.protocol_counts.is_empty());
    }

    #[test]
    fn test_missing_abnormal_is_an_error() {
        let result: Result<PredictionReport, _> =
            serde_json::from_str(r#"{"anomaly_data": {"normal": 3}}"#);
        assert!(result.is_err());

        let result: Result<PredictionReport, _> = serde_json::from_str(r#"{"status": "ok"}"#);
        assert!(result.is_err());
    }
}
