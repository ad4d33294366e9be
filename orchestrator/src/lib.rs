//! End-to-end test orchestrator
//!
//! Manages the service under test around a whole test run: decides whether a
//! service already exists or must be spawned, prepares the environment, spawns
//! and waits for the service during setup, and stops it exactly once during
//! teardown. Setup and teardown run as separate invocations and hand the
//! service's identity over through a file on disk.

pub mod config;
pub mod core;
pub mod error;
pub mod runner;
pub mod services;
pub mod setup;
pub mod status;
pub mod teardown;
pub mod traits;

// Re-export commonly used types
pub use config::OrchestratorConfig;
pub use crate::core::{ReadinessPolicy, prepare_environment, wait_until_ready};
pub use error::{OrchestratorError, OrchestratorResult, PreconditionStep};
pub use runner::{SuiteOutcome, run_suite};
pub use setup::{Setup, SetupOutcome};
pub use status::{StatusReport, collect_status};
pub use teardown::{Teardown, TeardownOutcome};
pub use traits::{
    CommandRunner, CommandStatus, Environment, IdentityStore, LaunchSpec, ProbeOutcome, ProcessTerminator,
    ReadinessProbe, ServiceSpawner,
};

// Re-export mocks for integration tests
pub use traits::{
    MockCommandRunner, MockEnvironment, MockIdentityStore, MockProcessTerminator, MockReadinessProbe,
    MockServiceSpawner,
};
