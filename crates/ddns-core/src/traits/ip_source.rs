// # IP Source Trait
//
// Defines the interface for fetching the public IP from an external
// IP-echo service.
//
// ## Implementations
//
// - HTTP GET: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// let body = source.fetch().await?;
// let ip = ddns_core::ip::extract_ipv4(&body);
// ```

use async_trait::async_trait;

/// Trait for IP-echo implementations
///
/// The host platform's own IP detection is not always externally
/// reachable, so an echo source lets the updater ask a third party what
/// address the outside world sees.
///
/// # Contract
///
/// - Return the raw response body. Extracting the address is the
///   updater's job, so services that wrap the address in text or HTML work.
/// - Perform exactly one request per call, no retries.
/// - Map timeouts to `badconn` and resolver failures to `badresolv`.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Fetch the echo service's response body
    async fn fetch(&self) -> Result<String, crate::Error>;
}
