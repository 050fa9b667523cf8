//! Contract Test: Last-Known IP & Idempotency
//!
//! Constraints verified:
//! - A resolved IP equal to the last-known IP yields `nochg` with zero
//!   provider calls
//! - A second run with an unchanged IP yields `nochg`
//! - The IP-echo override is the only network call a `nochg` run makes
//! - Missing and unreadable last-known IP files both mean "no prior record"
//! - Every run appends exactly one line to the run log

mod common;

use common::*;
use ddns_core::traits::StateStore;
use ddns_core::{
    FileStateStore, MemoryStateStore, ResultCode, RunLog, Updater, UpdaterConfig,
};
use tempfile::tempdir;

const ARGS: &str = "example.com ABCD1234 home 203.0.113.5";

fn file_updater(config: &UpdaterConfig, factory: &MockProviderFactory) -> Updater {
    Updater::new(
        config.clone(),
        Box::new(factory.clone()),
        Box::new(FileStateStore::new(config.last_ip_path())),
    )
    .expect("updater construction succeeds")
    .with_run_log(RunLog::new(config.log_path()))
}

#[tokio::test]
async fn unchanged_ip_makes_no_provider_calls() {
    let factory = MockProviderFactory::new(Account::example());
    let updater = Updater::new(
        UpdaterConfig::new(),
        Box::new(factory.clone()),
        Box::new(MemoryStateStore::with_last_ip("203.0.113.5")),
    )
    .unwrap();

    let outcome = updater.run(ARGS).await;

    assert_eq!(outcome.code, ResultCode::NoChange);
    assert!(factory.calls().is_empty());
    assert!(factory.api_keys().is_empty(), "no provider should be built");
}

#[tokio::test]
async fn end_to_end_first_run_then_nochg() {
    let dir = tempdir().unwrap();
    let config = UpdaterConfig::new().with_state_dir(dir.path());

    // First run: no prior file, zone 10 / record 55 exist, update succeeds
    let factory = MockProviderFactory::new(Account::example());
    let outcome = file_updater(&config, &factory).run(ARGS).await;

    assert_eq!(outcome.code, ResultCode::Good);
    assert_eq!(factory.calls(), full_update_calls("203.0.113.5"));
    assert_eq!(
        std::fs::read_to_string(config.last_ip_path()).unwrap(),
        "203.0.113.5"
    );

    // Second run: same args, fresh process state, no network
    let factory = MockProviderFactory::new(Account::example());
    let outcome = file_updater(&config, &factory).run(ARGS).await;

    assert_eq!(outcome.code, ResultCode::NoChange);
    assert!(factory.calls().is_empty());

    let log = std::fs::read_to_string(config.log_path()).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(" : good : "), "line: {}", lines[0]);
    assert!(lines[1].contains(" : nochg : "), "line: {}", lines[1]);
}

#[tokio::test]
async fn second_run_is_nochg_even_after_earlier_failure() {
    let dir = tempdir().unwrap();
    let config = UpdaterConfig::new().with_state_dir(dir.path());

    // A failed run leaves no record behind
    let factory = MockProviderFactory::new(Account::default());
    let outcome = file_updater(&config, &factory).run(ARGS).await;
    assert_eq!(outcome.code, ResultCode::NoHost);
    assert!(!config.last_ip_path().exists());

    // Success persists the IP
    let factory = MockProviderFactory::new(Account::example());
    assert_eq!(
        file_updater(&config, &factory).run(ARGS).await.code,
        ResultCode::Good
    );

    // And the next run is a no-op
    let factory = MockProviderFactory::new(Account::example());
    assert_eq!(
        file_updater(&config, &factory).run(ARGS).await.code,
        ResultCode::NoChange
    );
    assert!(factory.calls().is_empty());
}

#[tokio::test]
async fn unreadable_record_is_treated_as_no_prior_ip() {
    let dir = tempdir().unwrap();
    let config = UpdaterConfig::new().with_state_dir(dir.path());
    std::fs::create_dir(config.last_ip_path()).unwrap();

    let factory = MockProviderFactory::new(Account::example());
    let outcome = file_updater(&config, &factory).run(ARGS).await;

    // The update goes through; the unwritable record is only a warning
    assert_eq!(outcome.code, ResultCode::Good);
    assert_eq!(factory.calls().len(), 3);
}

#[tokio::test]
async fn echo_override_replaces_reported_ip() {
    let factory = MockProviderFactory::new(Account::example());
    let store = MemoryStateStore::new();
    let echo = MockIpSource::new("Current IP Address: 192.0.2.77\n");

    let updater = Updater::new(
        UpdaterConfig::new(),
        Box::new(factory.clone()),
        Box::new(store.clone()),
    )
    .unwrap()
    .with_ip_source(Box::new(echo.clone()));

    let outcome = updater.run(ARGS).await;

    assert_eq!(outcome.code, ResultCode::Good);
    assert_eq!(echo.fetch_count(), 1);
    assert_eq!(factory.calls(), full_update_calls("192.0.2.77"));
    assert_eq!(store.load_last_ip().await.as_deref(), Some("192.0.2.77"));
}

#[tokio::test]
async fn nochg_with_echo_only_fetches_echo() {
    let factory = MockProviderFactory::new(Account::example());
    let echo = MockIpSource::new("192.0.2.77");

    let updater = Updater::new(
        UpdaterConfig::new(),
        Box::new(factory.clone()),
        Box::new(MemoryStateStore::with_last_ip("192.0.2.77")),
    )
    .unwrap()
    .with_ip_source(Box::new(echo.clone()));

    let outcome = updater.run(ARGS).await;

    assert_eq!(outcome.code, ResultCode::NoChange);
    assert_eq!(echo.fetch_count(), 1);
    assert!(factory.calls().is_empty());
}
