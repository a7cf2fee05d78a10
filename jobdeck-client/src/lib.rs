//! Jobdeck HTTP Client
//!
//! A small, type-safe client for the job backend's HTTP surface: the live job
//! list, the historical job archive, single-job lookup and job submission.
//!
//! The [`JobSource`] trait is the seam the dashboard depends on, so the
//! reconciliation and refresh logic can run against in-memory sources too.
//!
//! # Example
//!
//! ```no_run
//! use jobdeck_client::{BackendClient, JobSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BackendClient::new("http://localhost:8080");
//!
//!     let live = client.fetch_live_jobs().await?;
//!     println!("{} live job(s)", live.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod source;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use source::JobSource;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the job backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// Base URL of the backend (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl BackendClient {
    /// Create a new backend client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the backend (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use jobdeck_client::BackendClient;
    ///
    /// let client = BackendClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new backend client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use jobdeck_client::BackendClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = BackendClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the backend
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success statuses become [`TransportError::Api`] carrying the status
    /// code and the reason phrase, plus the body text when there is one.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Unknown status");
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                reason.to_string()
            } else {
                format!("{}: {}", reason, body.trim())
            };
            return Err(TransportError::api_error(status.as_u16(), message));
        }

        response
            .json()
            .await
            .map_err(|e| TransportError::Parse(format!("Failed to parse JSON response: {}", e)))
    }
}
