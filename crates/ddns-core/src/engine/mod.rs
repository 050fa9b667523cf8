//! One-shot update pipeline
//!
//! The Updater runs exactly one update attempt:
//!
//! ```text
//! parse → resolve IP → compare to last-known ─(same)─→ nochg
//!                                │
//!                            (changed)
//!                                ▼
//!             list zones → list records → update record → persist IP → good
//! ```
//!
//! Every step fails fast. [`Updater::run`] is the only place an error is
//! handled: it becomes the run's single [`RunOutcome`], which is appended to
//! the run log and handed back for printing.

use crate::config::UpdaterConfig;
use crate::error::{Error, Result, ResultCode};
use crate::invocation::Invocation;
use crate::ip::resolve_ip;
use crate::run_log::RunLog;
use crate::traits::{DnsProvider, DnsProviderFactory, IpSource, Record, StateStore, Zone};
use tracing::{debug, error, info, warn};

/// Terminal outcome of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Result code reported to the host platform
    pub code: ResultCode,
    /// Human-readable detail, written to the run log
    pub message: String,
}

impl RunOutcome {
    fn new(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<Error> for RunOutcome {
    fn from(err: Error) -> Self {
        Self::new(err.code(), err.message())
    }
}

/// One-shot DDNS updater
///
/// Built once per process from an explicit configuration, then run once.
pub struct Updater {
    config: UpdaterConfig,
    providers: Box<dyn DnsProviderFactory>,
    state_store: Box<dyn StateStore>,
    ip_source: Option<Box<dyn IpSource>>,
    run_log: Option<RunLog>,
}

impl std::fmt::Debug for Updater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Updater")
            .field("config", &self.config)
            .field("ip_source", &self.ip_source.is_some())
            .field("run_log", &self.run_log)
            .finish()
    }
}

impl Updater {
    /// Create a new updater
    ///
    /// # Parameters
    ///
    /// - `config`: Updater configuration (validated here)
    /// - `providers`: Builds the provider client once the credential is known
    /// - `state_store`: Last-known IP record
    pub fn new(
        config: UpdaterConfig,
        providers: Box<dyn DnsProviderFactory>,
        state_store: Box<dyn StateStore>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            providers,
            state_store,
            ip_source: None,
            run_log: None,
        })
    }

    /// Use an IP-echo source instead of the reported IP
    pub fn with_ip_source(mut self, source: Box<dyn IpSource>) -> Self {
        self.ip_source = Some(source);
        self
    }

    /// Append every outcome to `run_log`
    pub fn with_run_log(mut self, run_log: RunLog) -> Self {
        self.run_log = Some(run_log);
        self
    }

    /// Configuration this updater runs with
    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Run one update attempt for the raw argument string
    ///
    /// Never fails: every error is converted into the returned outcome.
    pub async fn run(&self, args: &str) -> RunOutcome {
        let outcome = match self.try_run(args).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Update failed ({}): {}", e.code(), e);
                RunOutcome::from(e)
            }
        };

        if let Some(ref run_log) = self.run_log {
            run_log.append(outcome.code, &outcome.message).await;
        }

        outcome
    }

    async fn try_run(&self, args: &str) -> Result<RunOutcome> {
        let invocation = Invocation::parse(args)?;
        debug!("Invocation: {:?}", invocation);

        let ip = resolve_ip(&invocation.ip_source, self.ip_source.as_deref()).await?;
        info!("Resolved IP: {}", ip);

        if let Some(last_ip) = self.state_store.load_last_ip().await {
            if last_ip == ip {
                info!("IP unchanged since last update: {}", ip);
                return Ok(RunOutcome::new(
                    ResultCode::NoChange,
                    format!("IP unchanged ({})", ip),
                ));
            }
            debug!("Last-known IP was {}", last_ip);
        }

        let provider = self.providers.create(&self.config, &invocation.api_key)?;
        let hostname = format!("{}.{}", invocation.subdomain, invocation.domain);

        let zone = locate_zone(provider.as_ref(), &invocation.domain).await?;
        let record = locate_record(provider.as_ref(), &zone, &invocation.subdomain).await?;

        if self.config.dry_run {
            info!(
                "[DRY-RUN] Would set {} (zone {}, record {}) to {} with TTL {}",
                hostname, zone.id, record.id, ip, self.config.record_ttl_secs
            );
            return Ok(RunOutcome::new(
                ResultCode::Good,
                format!("Dry run: {} would be set to {}", hostname, ip),
            ));
        }

        provider
            .update_record(&zone, &record, &ip, self.config.record_ttl_secs)
            .await?;
        info!(
            "Updated {} via {} -> {}",
            hostname,
            provider.provider_name(),
            ip
        );

        // The provider already accepted the change, so a failed write only
        // costs a redundant update next run.
        if let Err(e) = self.state_store.save_last_ip(&ip).await {
            warn!("Failed to persist last-known IP: {}", e);
        }

        Ok(RunOutcome::new(
            ResultCode::Good,
            format!("{} updated to {}", hostname, ip),
        ))
    }
}

/// Find the zone whose name equals `domain`
async fn locate_zone(provider: &dyn DnsProvider, domain: &str) -> Result<Zone> {
    let zones = provider.list_zones().await?;
    debug!("Provider returned {} zone(s)", zones.len());

    zones
        .into_iter()
        .find(|zone| zone.name == domain)
        .ok_or_else(|| Error::no_host(format!("Zone not found: {}", domain)))
}

/// Find the record under `zone` whose name equals `subdomain`
async fn locate_record(provider: &dyn DnsProvider, zone: &Zone, subdomain: &str) -> Result<Record> {
    let records = provider.list_records(zone).await?;
    debug!("Zone {} has {} record(s)", zone.name, records.len());

    records
        .into_iter()
        .find(|record| record.name == subdomain)
        .ok_or_else(|| {
            Error::no_host(format!("Record not found: {} in zone {}", subdomain, zone.name))
        })
}
