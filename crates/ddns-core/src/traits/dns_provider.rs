// # DNS Provider Trait
//
// Defines the interface for locating and updating a DNS record via a
// provider API.
//
// ## Implementations
//
// - Linode v3 JSON API: `ddns-provider-linode` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// let zones = provider.list_zones().await?;
// let zone = zones.iter().find(|z| z.name == "example.com").unwrap();
// let records = provider.list_records(zone).await?;
// let record = records.iter().find(|r| r.name == "home").unwrap();
// provider.update_record(zone, record, "203.0.113.5", 300).await?;
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A provider zone, the container for one primary domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-assigned zone identifier
    pub id: u64,
    /// Primary domain name (e.g. "example.com")
    pub name: String,
}

/// A single record inside a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Provider-assigned record identifier
    pub id: u64,
    /// Record name relative to the zone (e.g. "home")
    pub name: String,
    /// Record type, if the provider reports it
    pub record_type: Option<String>,
    /// Current target, if the provider reports it
    pub target: Option<String>,
}

/// Trait for DNS provider implementations
///
/// The provider exposes no "get record by name" call, only enumeration, so
/// locating a record always takes a zone listing followed by a record
/// listing. The updater does the name matching; providers only talk to
/// their API.
///
/// # Contract
///
/// - One HTTP request per method call
/// - No retries or backoff; every failure is terminal for the run
/// - No caching between calls
/// - Never log the credential
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List every zone owned by the account
    async fn list_zones(&self) -> Result<Vec<Zone>, crate::Error>;

    /// List every record under `zone`
    async fn list_records(&self, zone: &Zone) -> Result<Vec<Record>, crate::Error>;

    /// Point `record` at `target` with the given TTL
    async fn update_record(
        &self,
        zone: &Zone,
        record: &Record,
        target: &str,
        ttl_secs: u32,
    ) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers
///
/// The credential arrives with the invocation, so providers are built per
/// run after the arguments are parsed.
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance for the given credential
    fn create(
        &self,
        config: &crate::config::UpdaterConfig,
        api_key: &str,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
