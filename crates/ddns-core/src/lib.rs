// # ddns-core
//
// Core library for the one-shot DDNS updater.
//
// ## Architecture Overview
//
// A single run takes the host platform's argument string and ends in exactly
// one result code:
// - **Invocation**: Parses `domain apikey subdomain ip`
// - **IpSource**: Optional IP-echo service overriding the reported IP
// - **StateStore**: Last-known IP record that suppresses redundant updates
// - **DnsProvider**: Zone/record enumeration and record update via a provider API
// - **Updater**: Runs the pipeline and converts any failure into a result code
// - **RunLog**: Append-only log of every terminal outcome
//
// ## Design Principles
//
// 1. **Run to completion**: Sequential, no retries; the host re-invokes
// 2. **Flat error taxonomy**: Every error carries one result code
// 3. **Single catch point**: Only `Updater::run` turns errors into outcomes
// 4. **Library-first**: The binary is a thin shell around this crate

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod invocation;
pub mod ip;
pub mod run_log;
pub mod state;

// Re-export core types for convenience
pub use traits::{DnsProvider, DnsProviderFactory, IpSource, Record, StateStore, Zone};
pub use engine::{RunOutcome, Updater};
pub use config::UpdaterConfig;
pub use error::{Error, Result, ResultCode};
pub use invocation::Invocation;
pub use run_log::RunLog;
pub use state::{FileStateStore, MemoryStateStore};
