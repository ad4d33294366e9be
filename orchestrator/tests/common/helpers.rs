//! Test helpers and builder patterns for orchestrator tests
//!
//! This module provides convenient helper functions and builder patterns
//! to reduce test boilerplate and improve maintainability.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use orchestrator::services::FileIdentityStore;
use orchestrator::{
    CommandStatus, MockCommandRunner, MockProcessTerminator, MockServiceSpawner, ProbeOutcome, ReadinessProbe,
    Setup,
};
use url::Url;

use super::fixtures::{TestFixtures, Workspace};

/// Scripted readiness probe
///
/// Reports connection refused until attempt `ready_on`, then HTTP 200. Clones
/// share state, so a test can keep one handle and move another into `Setup`.
#[derive(Clone)]
pub struct ProbeScript {
    ready_on: Option<u32>,
    calls: Arc<AtomicU32>,
    watched_record: Option<PathBuf>,
    record_at_probe: Arc<Mutex<Vec<Option<String>>>>,
}

impl ProbeScript {
    /// Ready on the `attempt`-th probe (1-based)
    pub fn ready_on(attempt: u32) -> Self {
        Self {
            ready_on: Some(attempt),
            calls: Arc::new(AtomicU32::new(0)),
            watched_record: None,
            record_at_probe: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Connection refused forever
    pub fn never() -> Self {
        Self {
            ready_on: None,
            ..Self::ready_on(1)
        }
    }

    /// Capture the identity record content at every probe
    pub fn watching(mut self, record: PathBuf) -> Self {
        self.watched_record = Some(record);
        self
    }

    pub fn attempts(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn record_at_probe(&self) -> Vec<Option<String>> {
        self.record_at_probe.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ReadinessProbe for ProbeScript {
    async fn probe(&self, _url: &Url) -> ProbeOutcome {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(ref record) = self.watched_record {
            self.record_at_probe.lock().unwrap().push(fs::read_to_string(record).ok());
        }

        match self.ready_on {
            Some(ready_on) if attempt >= ready_on => ProbeOutcome::Ready { status: 200 },
            _ => ProbeOutcome::Unreachable {
                reason: "connection refused".to_string(),
            },
        }
    }
}

/// Type alias for setup with mocked commands, spawner and terminator, real record file
pub type TestSetup =
    Setup<MockCommandRunner, MockServiceSpawner, FileIdentityStore, ProbeScript, MockProcessTerminator>;

/// Builder pattern for creating test setups with strict mocks
///
/// Runner, spawner and terminator mocks start without expectations: any
/// unexpected build, migration, spawn or termination panics the test.
pub struct SetupBuilder {
    record: PathBuf,
    runner: MockCommandRunner,
    spawner: MockServiceSpawner,
    probe: ProbeScript,
    terminator: MockProcessTerminator,
}

impl SetupBuilder {
    pub fn new(workspace: &Workspace) -> Self {
        Self {
            record: workspace.record.clone(),
            runner: MockCommandRunner::new(),
            spawner: MockServiceSpawner::new(),
            probe: ProbeScript::ready_on(1),
            terminator: MockProcessTerminator::new(),
        }
    }

    /// Configure the command runner mock with a setup function
    pub fn with_runner<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockCommandRunner),
    {
        setup(&mut self.runner);
        self
    }

    /// Configure the spawner mock with a setup function
    pub fn with_spawner<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockServiceSpawner),
    {
        setup(&mut self.spawner);
        self
    }

    /// Configure the terminator mock with a setup function
    pub fn with_terminator<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockProcessTerminator),
    {
        setup(&mut self.terminator);
        self
    }

    pub fn with_probe(mut self, probe: ProbeScript) -> Self {
        self.probe = probe;
        self
    }

    pub fn build(self) -> TestSetup {
        Setup::new(
            self.runner,
            self.spawner,
            FileIdentityStore::new(self.record),
            self.probe,
            self.terminator,
        )
    }
}

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Expect `command` exactly once, exiting with `code`
    pub fn expect_command(runner: &mut MockCommandRunner, command: &'static str, code: i32) {
        runner
            .expect_run()
            .withf(move |c| c == command)
            .times(1)
            .returning(move |_| Ok(CommandStatus::from_code(code)));
    }

    /// Expect the test program `program` exactly once with `args`, exiting with `code`
    pub fn expect_program(
        runner: &mut MockCommandRunner,
        program: &'static str,
        args: &'static [&'static str],
        code: i32,
    ) {
        runner
            .expect_run_program()
            .withf(move |p, a| p == program && a == args)
            .times(1)
            .returning(move |_, _| Ok(CommandStatus::from_code(code)));
    }

    /// Expect exactly one spawn returning `pid`
    pub fn expect_spawn(spawner: &mut MockServiceSpawner, pid: u32) {
        spawner.expect_spawn().times(1).returning(move |_| Ok(pid));
    }

    /// Setup for a managed run whose artifact exists and whose migration succeeds
    pub fn managed_setup(workspace: &Workspace, probe: ProbeScript) -> TestSetup {
        SetupBuilder::new(workspace)
            .with_runner(|runner| Self::expect_command(runner, TestFixtures::MIGRATE_CMD, 0))
            .with_spawner(|spawner| Self::expect_spawn(spawner, TestFixtures::SERVICE_PID))
            .with_probe(probe)
            .build()
    }
}
