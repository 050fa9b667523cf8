//! IP resolution
//!
//! Picks the first dotted-quad-shaped substring out of the reported IP
//! source, or out of an IP-echo response body when an echo source is set.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::IpSource;

/// ASCII digits only, so non-Latin numerals never count as octets
static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}").expect("IPv4 pattern is valid")
});

/// Resolve the IP to publish
///
/// When `echo` is set its response body replaces `reported` entirely.
pub async fn resolve_ip(reported: &str, echo: Option<&dyn IpSource>) -> Result<String> {
    let source = match echo {
        Some(echo) => {
            let body = echo.fetch().await?;
            debug!("IP-echo response: {}", body.trim());
            body
        }
        None => reported.to_string(),
    };

    extract_ipv4(&source)
        .map(str::to_string)
        .ok_or_else(|| Error::malformed_ip(format!("No IPv4 address found in '{}'", source.trim())))
}

/// Find the leftmost `d{1,3}.d{1,3}.d{1,3}.d{1,3}` substring
///
/// Only the shape is checked, octet values are not range checked.
pub fn extract_ipv4(text: &str) -> Option<&str> {
    IPV4.find(text).map(|m| m.as_str())
}
