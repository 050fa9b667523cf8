// # ddns-update - One-shot DDNS update command
//
// Invoked by the NAS host platform once per detected change:
//
// ```bash
// ddns-update "example.com ABCD1234 home 203.0.113.5"
// ```
//
// Prints exactly one result code on stdout (`good`, `nochg`, `badauth`,
// `nohost`, `badagent`, `badconn`, `badresolv` or `911`) and exits.
// Diagnostics go to stderr so stdout stays machine-readable.
//
// This is a THIN integration layer: all update logic lives in ddns-core.
//
// ## Configuration
//
// Deploy-time settings come from environment variables:
//
// - `DDNS_STATE_DIR`: Directory for `<prefix>.lastip` and `<prefix>.log` (default `/tmp`)
// - `DDNS_FILE_PREFIX`: File name prefix (default `ddns_linode`)
// - `DDNS_IP_ECHO_URL`: Fetch the IP from this URL instead of the argument
// - `DDNS_RECORD_TTL`: TTL in seconds for the updated record (default 300)
// - `DDNS_API_BASE`: Provider API endpoint (default `https://api.linode.com/`)
// - `DDNS_CONNECT_TIMEOUT_SECS`: Connect timeout (default 8)
// - `DDNS_REQUEST_TIMEOUT_SECS`: Overall request timeout (default 10)
// - `DDNS_MODE`: `dry-run` to look up without updating (default `live`)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default `warn`)

use anyhow::{Context, Result};
use ddns_core::{FileStateStore, ResultCode, RunLog, RunOutcome, Updater, UpdaterConfig};
use ddns_ip_http::HttpIpSource;
use ddns_provider_linode::LinodeFactory;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Deployment settings read from the environment
#[derive(Debug)]
struct Settings {
    config: UpdaterConfig,
    log_level: Level,
}

impl Settings {
    /// Load settings from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(env_var)
    }

    /// Load settings through `lookup`; blank values count as unset
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| non_blank(lookup(name));
        let mut config = file_locations(&lookup);

        config.ip_echo_url = var("DDNS_IP_ECHO_URL");
        if let Some(base) = var("DDNS_API_BASE") {
            config.api_base = base;
        }
        if let Some(ttl) = parse_var(&var, "DDNS_RECORD_TTL")? {
            config.record_ttl_secs = ttl;
        }
        if let Some(secs) = parse_var(&var, "DDNS_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout_secs = secs;
        }
        if let Some(secs) = parse_var(&var, "DDNS_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout_secs = secs;
        }

        config.dry_run = match var("DDNS_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("live") => false,
            Some("dry-run") => true,
            Some(other) => anyhow::bail!(
                "DDNS_MODE '{}' is not valid. Valid modes: live, dry-run",
                other
            ),
        };

        let log_level = match var("DDNS_LOG_LEVEL").map(|l| l.to_lowercase()).as_deref() {
            None => Level::WARN,
            Some("trace") => Level::TRACE,
            Some("debug") => Level::DEBUG,
            Some("info") => Level::INFO,
            Some("warn") => Level::WARN,
            Some("error") => Level::ERROR,
            Some(other) => anyhow::bail!(
                "DDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        };

        config
            .validate()
            .context("Configuration validation error")?;

        Ok(Self { config, log_level })
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Defaults plus the state directory and file prefix
///
/// These two never fail to parse, so the run log location is known even
/// when the rest of the settings are rejected.
fn file_locations(lookup: &impl Fn(&str) -> Option<String>) -> UpdaterConfig {
    let mut config = UpdaterConfig::new();
    if let Some(dir) = non_blank(lookup("DDNS_STATE_DIR")) {
        config.state_dir = dir.into();
    }
    if let Some(prefix) = non_blank(lookup("DDNS_FILE_PREFIX")) {
        config.file_prefix = prefix;
    }
    config
}

/// Variable parsed as `T`
fn parse_var<T>(var: impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)
        .map(|v| {
            v.trim()
                .parse()
                .with_context(|| format!("{} has an invalid value: '{}'", name, v))
        })
        .transpose()
}

/// The host passes one argument; tolerate the four tokens arriving split
fn join_args(args: impl IntoIterator<Item = String>) -> String {
    args.into_iter().collect::<Vec<_>>().join(" ")
}

/// Process exit status for a result code
fn exit_status(code: ResultCode) -> u8 {
    if code.is_success() { 0 } else { 1 }
}

/// Print the single result line the host platform reads
fn report(code: ResultCode) -> ExitCode {
    println!("{}", code);
    ExitCode::from(exit_status(code))
}

fn main() -> ExitCode {
    let args = join_args(env::args().skip(1));

    // Everything runs on this thread, one await after another
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {}", e);
            return report(ResultCode::Unclassified);
        }
    };

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            let run_log = RunLog::new(settings_log_path(env_var));
            let outcome = rt.block_on(settings_failure(&run_log, &e));
            return report(outcome.code);
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let outcome = rt.block_on(run(settings.config, &args));
    report(outcome.code)
}

/// Run log location for runs whose settings were rejected
fn settings_log_path(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    file_locations(&lookup).log_path()
}

/// Record a rejected configuration as the run's outcome
async fn settings_failure(run_log: &RunLog, err: &anyhow::Error) -> RunOutcome {
    let outcome = RunOutcome {
        code: ResultCode::Unclassified,
        message: format!("Configuration error: {:#}", err),
    };
    run_log.append(outcome.code, &outcome.message).await;
    outcome
}

/// Build the updater and run one attempt
async fn run(config: UpdaterConfig, args: &str) -> RunOutcome {
    let run_log = RunLog::new(config.log_path());

    let updater = match build_updater(config) {
        Ok(updater) => updater.with_run_log(run_log),
        Err(e) => {
            error!("Startup error: {}", e);
            run_log.append(e.code(), e.message()).await;
            return RunOutcome::from(e);
        }
    };

    if updater.config().dry_run {
        warn!("Running in DRY-RUN mode - no DNS records will be changed");
    }

    let outcome = updater.run(args).await;
    info!("Finished: {} ({})", outcome.code, outcome.message);
    outcome
}

fn build_updater(config: UpdaterConfig) -> ddns_core::Result<Updater> {
    let state_store = FileStateStore::new(config.last_ip_path());
    let ip_source = HttpIpSource::from_config(&config)?;

    let updater = Updater::new(config, Box::new(LinodeFactory), Box::new(state_store))?;
    Ok(match ip_source {
        Some(source) => {
            info!("Using IP-echo service {}", source.url());
            updater.with_ip_source(Box::new(source))
        }
        None => updater,
    })
}
