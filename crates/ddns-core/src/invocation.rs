//! Invocation arguments
//!
//! The host platform passes `<domain> <apikey> <subdomain> <ip>` as one
//! whitespace-delimited string. Token contents are not validated here.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Parsed invocation request, immutable for the run
#[derive(Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Primary domain, matched against the provider's zone names
    pub domain: String,
    /// Provider API credential
    pub api_key: String,
    /// Record name within the zone
    pub subdomain: String,
    /// Raw IP source as reported by the host
    pub ip_source: String,
}

impl Invocation {
    /// Parse the four-token argument string
    pub fn parse(args: &str) -> Result<Self> {
        let tokens: Vec<&str> = args.split_whitespace().collect();
        match tokens.as_slice() {
            [domain, api_key, subdomain, ip_source] => Ok(Self {
                domain: domain.to_string(),
                api_key: api_key.to_string(),
                subdomain: subdomain.to_string(),
                ip_source: ip_source.to_string(),
            }),
            _ => Err(Error::bad_invocation(format!(
                "Expected 4 arguments 'domain apikey subdomain ip', got {}",
                tokens.len()
            ))),
        }
    }
}

impl FromStr for Invocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// Custom Debug implementation that hides the API key
impl fmt::Debug for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("domain", &self.domain)
            .field("api_key", &"<REDACTED>")
            .field("subdomain", &self.subdomain)
            .field("ip_source", &self.ip_source)
            .finish()
    }
}
