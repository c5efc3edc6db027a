//! HTTP prediction fetcher
//!
//! Issues `GET {api_url}/get-predictions` against the prediction API.

use super::report::PredictionReport;
use super::traits::PredictionFetcher;
use crate::error::FetchError;

use async_trait::async_trait;
use std::time::Duration;

/// Path of the prediction endpoint, relative to the API base URL
pub const PREDICTIONS_PATH: &str = "/get-predictions";

/// Build the full prediction URL from a base address
pub fn predictions_url(api_url: &str) -> String {
    format!("{}{}", api_url.trim_end_matches('/'), PREDICTIONS_PATH)
}

/// reqwest-backed [`PredictionFetcher`]
#[derive(Debug, Clone)]
pub struct HttpPredictionFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpPredictionFetcher {
    /// Create a fetcher for the API at `api_url`
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let url = predictions_url(api_url);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, url })
    }

    fn transport_error(&self, err: reqwest::Error) -> FetchError {
        FetchError::Transport {
            url: self.url.clone(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl PredictionFetcher for HttpPredictionFetcher {
    async fn fetch(&self) -> Result<PredictionReport, FetchError> {
        log::debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
