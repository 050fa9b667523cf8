// # HTTP IP Source
//
// This crate provides the IP-echo override for the DDNS updater.
//
// ## Purpose
//
// The host platform's own IP detection is not always reliable or
// externally reachable. When an echo URL is configured, the updater asks
// that service instead and extracts the address from its response body.
//
// ## Behavior
//
// - One GET per run, no retries
// - The raw body is returned; services that wrap the address in text work
// - Timeouts map to `badconn`, resolver failures to `badresolv`

use ddns_core::config::UpdaterConfig;
use ddns_core::error::is_resolution_failure;
use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::time::Duration;

/// HTTP-based IP-echo source
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "https://api.ipify.org")
    /// - `connect_timeout`: Connect timeout for the request
    /// - `timeout`: Overall timeout for the request
    pub fn new(url: impl Into<String>, connect_timeout: Duration, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Build the echo source the configuration asks for, if any
    pub fn from_config(config: &UpdaterConfig) -> Result<Option<Self>> {
        match config.ip_echo_url {
            Some(ref url) => Self::new(
                url.clone(),
                Duration::from_secs(config.connect_timeout_secs),
                Duration::from_secs(config.request_timeout_secs),
            )
            .map(Some),
            None => Ok(None),
        }
    }

    /// URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn fetch(&self) -> Result<String> {
        tracing::debug!("Fetching IP from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| request_error(&self.url, e))?;

        if !response.status().is_success() {
            return Err(Error::transport(format!(
                "IP-echo service {} returned HTTP {}",
                self.url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| request_error(&self.url, e))
    }
}

/// Classify a failed request by result code
fn request_error(url: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("IP-echo request to {} timed out", url))
    } else if is_resolution_failure(&e) {
        Error::resolve(format!("Could not resolve IP-echo host {}: {}", url, e))
    } else {
        Error::transport(format!("IP-echo request to {} failed: {}", url, e))
    }
}
