//! Output formatting utilities
//!
//! Provides table, JSON and compact output for CLI commands, plus the
//! terminal rendering of the live alert view.

use crate::alerts::{AlertRecord, AlertView, SeverityIcon};
use crate::cli::args::OutputFormat;
use crate::sources::PredictionReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// Check if the terminal supports colors
pub fn supports_color() -> bool {
    std::env::var("TERM")
        .map(|term| term != "dumb")
        .unwrap_or(false)
}

/// Severity label, optionally colored with ANSI escape codes
pub fn severity_label(icon: SeverityIcon, use_colors: bool) -> String {
    let text = match icon {
        SeverityIcon::Error => "ERROR",
        SeverityIcon::Warning => "WARNING",
        SeverityIcon::Info => "INFO",
        SeverityIcon::Neutral => "-",
    };

    if !use_colors {
        return format!("{:<7}", text);
    }

    let color_code = match icon {
        SeverityIcon::Error => "\x1b[31m",   // Red
        SeverityIcon::Warning => "\x1b[33m", // Yellow
        SeverityIcon::Info => "\x1b[36m",    // Cyan
        SeverityIcon::Neutral => "\x1b[2m",  // Dim
    };

    format!("{}{:<7}\x1b[0m", color_code, text)
}

fn alert_line(alert: &AlertRecord, use_colors: bool) -> String {
    format!(
        "  {} {}",
        severity_label(alert.severity.icon(), use_colors),
        alert.message
    )
}

/// Render the alert view as the operator sees it
pub fn render_view(view: &AlertView, use_colors: bool) -> String {
    let mut output = String::from("Alert System\n\n");

    if view.is_loading {
        output.push_str("  Loading alerts...\n");
    } else if view.alerts.is_empty() {
        output.push_str("  No alerts\n");
    }

    // Stream alerts may arrive before loading settles; show them regardless
    for alert in &view.alerts {
        output.push_str(&alert_line(alert, use_colors));
        output.push('\n');
    }

    if view.rejected_payloads > 0 {
        output.push_str(&format!(
            "\n  ({} malformed payloads dropped)\n",
            view.rejected_payloads
        ));
    }

    if view.notification.visible {
        output.push_str(&format!(
            "\n>> {}  [Enter to dismiss]\n",
            view.notification.message
        ));
    }

    output
}

impl TableDisplay for AlertView {
    fn to_table(&self) -> String {
        render_view(self, false)
    }

    fn to_compact(&self) -> String {
        let state = if self.is_loading { "loading" } else { "ready" };
        let mut line = format!("{} alerts ({})", self.alerts.len(), state);
        if let Some(last) = self.alerts.last() {
            line.push_str(&format!(" | last: [{}] {}", last.severity, last.message));
        }
        if self.notification.visible {
            line.push_str(&format!(" | notify: {}", self.notification.message));
        }
        line
    }
}

/// Prediction fetch result for display
#[derive(Debug, Clone, Serialize)]
pub struct PredictionSummary {
    pub endpoint: String,
    pub normal: u64,
    pub abnormal: u64,
    pub total: u64,
    pub protocol_counts: BTreeMap<String, u64>,
    pub alert: AlertRecord,
}

impl PredictionSummary {
    /// Build a summary from a fetched report
    pub fn new(endpoint: impl Into<String>, report: &PredictionReport) -> Self {
        Self {
            endpoint: endpoint.into(),
            normal: report.anomaly_data.normal,
            abnormal: report.abnormal(),
            total: report.total(),
            protocol_counts: report.protocol_counts.clone(),
            alert: AlertRecord::from_anomaly_count(report.abnormal()),
        }
    }
}

impl TableDisplay for PredictionSummary {
    fn to_table(&self) -> String {
        let mut output = format!("Predictions ({})\n", self.endpoint);
        output.push_str(&format!("  Normal:   {}\n", self.normal));
        output.push_str(&format!("  Abnormal: {}\n", self.abnormal));
        output.push_str(&format!("  Total:    {}\n", self.total));

        if !self.protocol_counts.is_empty() {
            output.push_str("  Protocols:\n");
            for (protocol, count) in &self.protocol_counts {
                output.push_str(&format!("    {:<6} {}\n", protocol, count));
            }
        }

        output.push_str(&format!("\n{}", alert_line(&self.alert, false)));
        output
    }

    fn to_compact(&self) -> String {
        format!(
            "abnormal={} normal={} total={}",
            self.abnormal, self.normal, self.total
        )
    }
}
