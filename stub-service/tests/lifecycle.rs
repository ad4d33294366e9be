//! End-to-end lifecycle against the real stub-service binary
//!
//! Uses the orchestrator's real services: shell commands, process spawning,
//! the identity record file, HTTP probing and SIGTERM.

#![cfg(unix)]

use std::net::TcpListener;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use orchestrator::services::{
    FileIdentityStore, HttpReadinessProbe, RealCommandRunner, RealServiceSpawner, SignalTerminator,
};
use orchestrator::{OrchestratorConfig, OrchestratorError, ProbeOutcome, ReadinessProbe, Setup, Teardown, TeardownOutcome};
use shared::{ProcessIdentity, RunMode};
use tempfile::TempDir;
use url::Url;

const STUB_BIN: &str = env!("CARGO_BIN_EXE_stub-service");

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
}

fn base_url(port: u16) -> Url {
    Url::parse(&format!("http://127.0.0.1:{port}")).unwrap()
}

fn config(mode: RunMode, port: u16, startup_delay_ms: u64) -> OrchestratorConfig {
    OrchestratorConfig::new(mode, base_url(port))
        .with_service(
            STUB_BIN,
            vec![
                "--port".to_string(),
                port.to_string(),
                "--startup-delay-ms".to_string(),
                startup_delay_ms.to_string(),
            ],
        )
        .with_commands("false", "true")
        .with_readiness(Duration::from_millis(50), Duration::from_secs(10))
}

type RealSetup = Setup<RealCommandRunner, RealServiceSpawner, FileIdentityStore, HttpReadinessProbe, SignalTerminator>;

fn setup(record: PathBuf) -> RealSetup {
    Setup::new(
        RealCommandRunner::new(),
        RealServiceSpawner::new(),
        FileIdentityStore::new(record),
        HttpReadinessProbe::new().unwrap(),
        SignalTerminator::new(),
    )
}

fn teardown(record: PathBuf) -> Teardown<FileIdentityStore, SignalTerminator> {
    Teardown::new(FileIdentityStore::new(record), SignalTerminator::new())
}

/// Probe until the service stops answering
async fn wait_until_gone(url: &Url) -> bool {
    let probe = HttpReadinessProbe::new().unwrap();
    for _ in 0..100 {
        if matches!(probe.probe(url).await, ProbeOutcome::Unreachable { .. }) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_managed_service_is_started_awaited_and_stopped() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join(".e2e").join("service.pid");
    let port = free_port();
    let config = config(RunMode::Managed, port, 400);

    let outcome = setup(record.clone()).run(&config).await.unwrap();

    let ProcessIdentity::Managed(pid) = outcome.identity else {
        panic!("Expected a managed identity, got {:?}", outcome.identity);
    };
    // 503 during the startup delay keeps the probe polling
    assert!(outcome.attempts > 1);
    assert_eq!(std::fs::read_to_string(&record).unwrap(), pid.to_string());

    assert_eq!(teardown(record.clone()).run(), TeardownOutcome::Terminated { pid });
    assert!(!record.exists());
    assert!(wait_until_gone(&config.health_url()).await);

    assert_eq!(teardown(record).run(), TeardownOutcome::NoRecord);
}

#[tokio::test]
async fn test_external_service_survives_teardown() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("service.pid");
    let port = free_port();
    let mut service = Command::new(STUB_BIN)
        .args(["--port", &port.to_string()])
        .spawn()
        .unwrap();

    let config = config(RunMode::External, port, 0);
    let outcome = setup(record.clone()).run(&config).await.unwrap();
    assert_eq!(outcome.identity, ProcessIdentity::External);

    assert_eq!(teardown(record).run(), TeardownOutcome::External);

    let probe = HttpReadinessProbe::new().unwrap();
    assert!(probe.probe(&config.health_url()).await.is_ready());

    service.kill().unwrap();
    service.wait().unwrap();
}

#[tokio::test]
async fn test_service_that_stays_unhealthy_times_out_and_is_cleaned_up() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("service.pid");
    let port = free_port();
    let config = config(RunMode::Managed, port, 60_000)
        .with_readiness(Duration::from_millis(50), Duration::from_millis(500));

    let err = setup(record.clone()).run(&config).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::ReadinessTimeout { .. }));

    // the record survives the failed setup so teardown can stop the process
    assert!(record.exists());
    assert!(matches!(teardown(record).run(), TeardownOutcome::Terminated { .. }));
    assert!(wait_until_gone(&config.health_url()).await);
}
