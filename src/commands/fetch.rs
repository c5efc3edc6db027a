//! Fetch command implementation
//!
//! Queries the prediction API once and prints the summary.

use crate::cli::args::OutputFormat;
use crate::cli::output::{print_output, PredictionSummary};
use crate::config::Config;
use crate::error::Result;
use crate::sources::{HttpPredictionFetcher, PredictionFetcher};

/// Execute the fetch command
pub async fn run_fetch(config: &Config, format: OutputFormat) -> Result<()> {
    let fetcher = HttpPredictionFetcher::new(&config.endpoints.api_url, config.request_timeout())?;
    let summary = fetch_summary(&fetcher).await?;
    print_output(&summary, format)?;
    Ok(())
}

/// Fetch predictions and build a display summary
pub async fn fetch_summary<F: PredictionFetcher + ?Sized>(fetcher: &F) -> Result<PredictionSummary> {
    let report = fetcher.fetch().await?;
    log::debug!(
        "Prediction report: {} abnormal of {}",
        report.abnormal(),
        report.total()
    );
    Ok(PredictionSummary::new(fetcher.endpoint(), &report))
}
