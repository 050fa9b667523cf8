//! Test doubles and common utilities for updater contract tests
//!
//! These doubles record every provider call in order so tests can assert
//! on the exact network traffic a run would produce.

#![allow(dead_code)]

use ddns_core::config::UpdaterConfig;
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DnsProviderFactory, IpSource, Record, Zone};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A provider call as seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListZones,
    ListRecords { zone_id: u64 },
    UpdateRecord {
        zone_id: u64,
        record_id: u64,
        target: String,
        ttl_secs: u32,
    },
}

/// Canned provider account: zones, records, and optional failures
#[derive(Debug, Clone, Default)]
pub struct Account {
    pub zones: Vec<Zone>,
    pub records: Vec<(u64, Record)>,
    pub fail_list_zones: Option<Error>,
    pub fail_list_records: Option<Error>,
    pub fail_update: Option<Error>,
}

impl Account {
    /// Account with zone `10` = example.com and record `55` = home
    pub fn example() -> Self {
        Self::default()
            .with_zone(10, "example.com")
            .with_zone(11, "example.org")
            .with_record(10, 54, "www")
            .with_record(10, 55, "home")
            .with_record(11, 56, "home")
    }

    pub fn with_zone(mut self, id: u64, name: &str) -> Self {
        self.zones.push(Zone {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_record(mut self, zone_id: u64, id: u64, name: &str) -> Self {
        self.records.push((
            zone_id,
            Record {
                id,
                name: name.to_string(),
                record_type: Some("A".to_string()),
                target: Some("192.0.2.1".to_string()),
            },
        ));
        self
    }
}

/// A mock DnsProvider that records calls in order
pub struct MockDnsProvider {
    account: Account,
    calls: Arc<Mutex<Vec<Call>>>,
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.calls.lock().unwrap().push(Call::ListZones);
        match self.account.fail_list_zones {
            Some(ref e) => Err(e.clone()),
            None => Ok(self.account.zones.clone()),
        }
    }

    async fn list_records(&self, zone: &Zone) -> Result<Vec<Record>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::ListRecords { zone_id: zone.id });
        match self.account.fail_list_records {
            Some(ref e) => Err(e.clone()),
            None => Ok(self
                .account
                .records
                .iter()
                .filter(|(zone_id, _)| *zone_id == zone.id)
                .map(|(_, record)| record.clone())
                .collect()),
        }
    }

    async fn update_record(
        &self,
        zone: &Zone,
        record: &Record,
        target: &str,
        ttl_secs: u32,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(Call::UpdateRecord {
            zone_id: zone.id,
            record_id: record.id,
            target: target.to_string(),
            ttl_secs,
        });
        match self.account.fail_update {
            Some(ref e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Factory handing out providers that share one call log
#[derive(Clone)]
pub struct MockProviderFactory {
    account: Account,
    calls: Arc<Mutex<Vec<Call>>>,
    api_keys: Arc<Mutex<Vec<String>>>,
}

impl MockProviderFactory {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            calls: Arc::new(Mutex::new(Vec::new())),
            api_keys: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every provider call made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Credentials providers were created with
    pub fn api_keys(&self) -> Vec<String> {
        self.api_keys.lock().unwrap().clone()
    }
}

impl DnsProviderFactory for MockProviderFactory {
    fn create(&self, _config: &UpdaterConfig, api_key: &str) -> Result<Box<dyn DnsProvider>> {
        self.api_keys.lock().unwrap().push(api_key.to_string());
        Ok(Box::new(MockDnsProvider {
            account: self.account.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

/// An IpSource returning a fixed body and counting fetches
#[derive(Clone)]
pub struct MockIpSource {
    body: String,
    fetch_count: Arc<AtomicUsize>,
}

impl MockIpSource {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            fetch_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for MockIpSource {
    async fn fetch(&self) -> Result<String> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

/// The three calls of a successful update of record 55 in zone 10
pub fn full_update_calls(target: &str) -> Vec<Call> {
    vec![
        Call::ListZones,
        Call::ListRecords { zone_id: 10 },
        Call::UpdateRecord {
            zone_id: 10,
            record_id: 55,
            target: target.to_string(),
            ttl_secs: 300,
        },
    ]
}
