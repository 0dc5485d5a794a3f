//! Submission of extracted records to an intake endpoint.

use crate::error::{CliError, Result};
use dme_domain::NormalizedOrder;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const SUBMIT_TIMEOUT_SECS: u64 = 30;

/// Posts one JSON record per request; no retries
#[derive(Debug, Clone)]
pub struct Submitter {
    endpoint: String,
    client: Client,
}

impl Submitter {
    /// Create a submitter for an endpoint
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SUBMIT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CliError::Submission(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Endpoint records are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST a record; any non-success status is an error
    pub async fn submit(&self, order: &NormalizedOrder) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(order)
            .send()
            .await
            .map_err(|e| CliError::Submission(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Submission to {} rejected with {}", self.endpoint, status);
            return Err(CliError::Submission(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        debug!("Submitted '{}' order to {}", order.device(), self.endpoint);
        Ok(())
    }
}
