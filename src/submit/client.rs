// src/submit/client.rs
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

use super::record::SubmissionRecord;
use super::sender::{ObservationSender, SendError};

pub const DEFAULT_API_BASE: &str = "https://stations.windy.com/pws/update/";

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Windy station update endpoint
pub struct WindyClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl WindyClient {
    /// Create a new client posting to `api_base` + `api_key`.
    /// Returns an error if the HTTP client fails to build (e.g., TLS configuration issues).
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| format!("failed to build HTTP client: {}", e))?;
        Ok(Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
        })
    }

    /// Full update URI. Contains the API key, so never log it.
    fn uri(&self) -> String {
        format!("{}{}", self.api_base, self.api_key)
    }
}

#[async_trait::async_trait]
impl ObservationSender for WindyClient {
    #[tracing::instrument(
        name = "windy_submit",
        skip(self, record),
        fields(endpoint = %self.api_base)
    )]
    async fn submit(&self, record: &SubmissionRecord) -> Result<u16, SendError> {
        let body = serde_json::to_vec(record).map_err(|e| SendError::Serialize(e.to_string()))?;
        debug!(body = %String::from_utf8_lossy(&body), "submitting data");

        let response = self
            .client
            .post(self.uri())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SendError::Timeout
                } else {
                    SendError::Network(e.without_url().to_string())
                }
            })?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            // Try to get response body for better error diagnostics
            let resp_body = response
                .text()
                .await
                .unwrap_or_else(|_| "(failed to read body)".to_string());
            error!(
                status,
                response_body = %resp_body,
                "station endpoint returned error status"
            );
            return Err(SendError::Http { status });
        }

        Ok(status)
    }
}
