// # Linode DNS Provider
//
// This crate provides the DNS provider client for the Linode v3 JSON API.
//
// ## Behavior
//
// - One HTTP POST per trait call, form-encoded `api_key` + `api_action`
// - Connect and overall timeouts on every call
// - No retries, no caching: every failure is terminal for the run
// - The API key never appears in logs or Debug output
//
// ## Response Envelope
//
// ```json
// {
//   "ERRORARRAY": [{"ERRORCODE": 4, "ERRORMESSAGE": "Authentication failed"}],
//   "ACTION": "domain.list",
//   "DATA": []
// }
// ```
//
// An empty `ERRORARRAY` signals success and `DATA` carries the payload.
//
// ## API Reference
//
// - List zones: `api_action=domain.list`
// - List records: `api_action=domain.resource.list&DomainID=...`
// - Update record: `api_action=domain.resource.update&DomainID=...&ResourceID=...&Target=...&TTL_sec=...`

use async_trait::async_trait;
use ddns_core::config::UpdaterConfig;
use ddns_core::error::is_resolution_failure;
use ddns_core::traits::{DnsProvider, DnsProviderFactory, Record, Zone};
use ddns_core::{Error, Result, ResultCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Longest raw-response excerpt carried in an error message
const SNIPPET_MAX_CHARS: usize = 200;

/// Provider error codes with a dedicated result code; all others are `911`
const ERROR_CODE_TABLE: &[(i64, ResultCode)] = &[
    // Authentication failed
    (4, ResultCode::BadAuth),
    // Object not found
    (5, ResultCode::NoHost),
    // Permission denied
    (13, ResultCode::BadAuth),
];

/// Translate a provider error code into a result code
pub fn map_error_code(code: i64) -> ResultCode {
    ERROR_CODE_TABLE
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, result)| *result)
        .unwrap_or(ResultCode::Unclassified)
}

/// Response envelope shared by every action
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "ERRORARRAY", default)]
    errors: Option<Vec<ApiError>>,
    #[serde(rename = "DATA", default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "ERRORCODE")]
    code: i64,
    #[serde(rename = "ERRORMESSAGE", default)]
    message: String,
}

/// `domain.list` entry
#[derive(Debug, Deserialize)]
struct DomainEntry {
    #[serde(rename = "DOMAINID")]
    id: u64,
    #[serde(rename = "DOMAIN")]
    domain: String,
}

/// `domain.resource.list` entry
#[derive(Debug, Deserialize)]
struct ResourceEntry {
    #[serde(rename = "RESOURCEID")]
    id: u64,
    #[serde(rename = "NAME")]
    name: String,
    #[serde(rename = "TYPE", default)]
    record_type: Option<String>,
    #[serde(rename = "TARGET", default)]
    target: Option<String>,
}

/// `domain.resource.update` payload
///
/// Only the error array decides success; the echoed id is informational.
#[derive(Debug, Default, Deserialize)]
struct UpdateAck {
    #[serde(rename = "ResourceID", default)]
    resource_id: Option<u64>,
}

/// Collapse whitespace runs and cap the length of a raw response
pub fn clean_snippet(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > SNIPPET_MAX_CHARS {
        let mut cut: String = collapsed.chars().take(SNIPPET_MAX_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        collapsed
    }
}

/// Decode a raw response body into the action's `DATA` payload
///
/// - A body that is not a JSON object is a transport failure (`911`)
/// - The first `ERRORARRAY` entry is translated through the error table;
///   a missing or `null` array means no errors
/// - A missing or `null` `DATA` decodes as JSON `null`, so only payload
///   types that accept `null` (such as `Option<T>`) succeed without one
/// - A `DATA` payload of the wrong shape is a transport failure (`911`)
pub fn decode_response<T: DeserializeOwned>(action: &str, body: &str) -> Result<T> {
    let unexpected = || {
        Error::transport(format!(
            "Unexpected response to {}: {}",
            action,
            clean_snippet(body)
        ))
    };

    let value: Value = serde_json::from_str(body).map_err(|_| unexpected())?;
    if !value.is_object() {
        return Err(unexpected());
    }

    let envelope: Envelope = serde_json::from_value(value).map_err(|_| unexpected())?;

    if let Some(first) = envelope.errors.as_deref().and_then(<[ApiError]>::first) {
        let code = map_error_code(first.code);
        tracing::debug!(
            "{} returned provider error {} ({})",
            action,
            first.code,
            code
        );
        return Err(Error::new(code, first.message.clone()));
    }

    let data = envelope.data.unwrap_or(Value::Null);
    serde_json::from_value(data).map_err(|_| unexpected())
}

/// Linode DNS provider
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API key.
pub struct LinodeProvider {
    /// Linode API key
    /// ⚠️ NEVER log this value
    api_key: String,

    /// API endpoint every action is posted to
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for LinodeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinodeProvider")
            .field("api_key", &"<REDACTED>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl LinodeProvider {
    /// Create a new Linode provider
    ///
    /// # Parameters
    ///
    /// - `api_key`: Linode API key
    /// - `api_base`: API endpoint (normally `https://api.linode.com/`)
    /// - `connect_timeout`: Connect timeout for each call
    /// - `timeout`: Overall timeout for each call
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("Linode API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_key,
            api_base: api_base.into(),
            client,
        })
    }

    /// Create a provider from the updater configuration
    pub fn from_config(config: &UpdaterConfig, api_key: impl Into<String>) -> Result<Self> {
        Self::new(
            api_key,
            config.api_base.clone(),
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// POST one action and decode its `DATA` payload
    async fn call<T: DeserializeOwned>(&self, action: &str, params: &[(&str, String)]) -> Result<T> {
        let mut form: Vec<(&str, &str)> = vec![
            ("api_key", self.api_key.as_str()),
            ("api_action", action),
        ];
        form.extend(params.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self
            .client
            .post(&self.api_base)
            .form(&form)
            .send()
            .await
            .map_err(|e| request_error(action, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| request_error(action, e))?;

        if !status.is_success() {
            tracing::debug!("{} returned HTTP {}", action, status);
        }

        decode_response(action, &body)
    }
}

/// Classify a failed request by result code
fn request_error(action: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("{} timed out", action))
    } else if is_resolution_failure(&e) {
        Error::resolve(format!("Could not resolve provider host: {}", e))
    } else {
        Error::transport(format!("{} request failed: {}", action, e))
    }
}

#[async_trait]
impl DnsProvider for LinodeProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        tracing::debug!("Listing Linode domains");

        let domains: Vec<DomainEntry> = self.call("domain.list", &[]).await?;
        Ok(domains
            .into_iter()
            .map(|d| Zone {
                id: d.id,
                name: d.domain,
            })
            .collect())
    }

    async fn list_records(&self, zone: &Zone) -> Result<Vec<Record>> {
        tracing::debug!("Listing resources of domain {} ({})", zone.name, zone.id);

        let resources: Vec<ResourceEntry> = self
            .call("domain.resource.list", &[("DomainID", zone.id.to_string())])
            .await?;
        Ok(resources
            .into_iter()
            .map(|r| Record {
                id: r.id,
                name: r.name,
                record_type: r.record_type,
                target: r.target,
            })
            .collect())
    }

    async fn update_record(
        &self,
        zone: &Zone,
        record: &Record,
        target: &str,
        ttl_secs: u32,
    ) -> Result<()> {
        tracing::info!(
            "Updating Linode resource {} in domain {}: {} -> {}",
            record.id,
            zone.name,
            record.target.as_deref().unwrap_or("?"),
            target
        );

        let ack: Option<UpdateAck> = self
            .call(
                "domain.resource.update",
                &[
                    ("DomainID", zone.id.to_string()),
                    ("ResourceID", record.id.to_string()),
                    ("Target", target.to_string()),
                    ("TTL_sec", ttl_secs.to_string()),
                ],
            )
            .await?;

        match ack.unwrap_or_default().resource_id {
            Some(acked) if acked != record.id => tracing::warn!(
                "Update acknowledged resource {} instead of {}",
                acked,
                record.id
            ),
            Some(_) => {}
            None => tracing::debug!("Update of resource {} acknowledged without an id", record.id),
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "linode"
    }
}

/// Factory for creating Linode providers
pub struct LinodeFactory;

impl DnsProviderFactory for LinodeFactory {
    fn create(&self, config: &UpdaterConfig, api_key: &str) -> Result<Box<dyn DnsProvider>> {
        Ok(Box::new(LinodeProvider::from_config(config, api_key)?))
    }
}
