//! Core traits for the DDNS updater
//!
//! This module defines the seams between the update pipeline and its I/O.
//!
//! - [`DnsProvider`]: Enumerate zones/records and update a record via a provider API
//! - [`IpSource`]: Fetch the public IP from an echo service
//! - [`StateStore`]: Persist the last-known IP between invocations

pub mod ip_source;
pub mod dns_provider;
pub mod state_store;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsProviderFactory, Record, Zone};
pub use state_store::StateStore;
