//! Test fixtures and data for orchestrator tests
//!
//! This module provides consistent test data and fixtures used across all test suites.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use orchestrator::OrchestratorConfig;
use shared::RunMode;
use tempfile::TempDir;
use url::Url;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const BASE_URL: &'static str = "http://127.0.0.1:3000";
    pub const HEALTH_URL: &'static str = "http://127.0.0.1:3000/health";
    pub const BUILD_CMD: &'static str = "cargo build --release --bin job-board-api";
    pub const MIGRATE_CMD: &'static str = "cargo run --release --bin migrate";
    pub const SERVICE_PID: u32 = 4242;

    pub const POLL_INTERVAL: Duration = Duration::from_millis(250);
    pub const READY_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn base_url() -> Url {
        Url::parse(Self::BASE_URL).unwrap()
    }

    /// Configuration for `mode` with the artifact inside `workspace`
    pub fn config(mode: RunMode, workspace: &Workspace) -> OrchestratorConfig {
        OrchestratorConfig::new(mode, Self::base_url())
            .with_service(workspace.artifact.clone(), vec!["--port".to_string(), "3000".to_string()])
            .with_commands(Self::BUILD_CMD, Self::MIGRATE_CMD)
            .with_readiness(Self::POLL_INTERVAL, Self::READY_TIMEOUT)
    }
}

/// Temporary directory holding the identity record and the service artifact
pub struct Workspace {
    pub dir: TempDir,
    pub record: PathBuf,
    pub artifact: PathBuf,
}

impl Workspace {
    /// Workspace whose artifact has not been built yet
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let record = dir.path().join(".e2e").join("service.pid");
        let artifact = dir.path().join("target").join("release").join("job-board-api");
        Self { dir, record, artifact }
    }

    /// Workspace with an already built artifact
    pub fn with_artifact() -> Self {
        let workspace = Self::new();
        workspace.build_artifact();
        workspace
    }

    pub fn build_artifact(&self) {
        fs::create_dir_all(self.artifact.parent().unwrap()).unwrap();
        fs::write(&self.artifact, "#!/bin/sh\n").unwrap();
    }

    /// Current record content, if any
    pub fn record_content(&self) -> Option<String> {
        fs::read_to_string(&self.record).ok()
    }

    pub fn write_record(&self, content: &str) {
        fs::create_dir_all(self.record.parent().unwrap()).unwrap();
        fs::write(&self.record, content).unwrap();
    }
}
