//! Trait definitions with mockall annotations for testing
//!
//! Every side effect setup and teardown perform goes through one of these
//! traits: environment access, shell commands, process spawning, the identity
//! record, the readiness probe and process termination.

use serde::Serialize;
use shared::ProcessIdentity;
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::error::OrchestratorResult;

/// Exit status of an external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    pub success: bool,
    /// None when the command was terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self {
            success: code == 0,
            code: Some(code),
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => write!(f, "termination by signal"),
        }
    }
}

/// What to execute when launching the service under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Result of a single readiness poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// HTTP success status observed
    Ready { status: u16 },
    /// Service answered with a non-success status
    NotReady { status: u16 },
    /// Connection refused, DNS failure, request timeout and friends
    Unreachable { reason: String },
}

impl ProbeOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, ProbeOutcome::Ready { .. })
    }
}

/// Process-wide environment abstraction for dependency injection
///
/// Setup mutates the real process environment; tests substitute an in-memory map.
#[mockall::automock]
pub trait Environment: Send + Sync {
    /// Current value of `key`, if set
    fn get(&self, key: &str) -> Option<String>;

    /// Set `key` for the remainder of the run
    fn set(&mut self, key: &str, value: &str);
}

/// Synchronous command execution (build, migration, test suite)
#[mockall::automock]
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` through the platform shell with inherited stdio and wait for it
    async fn run(&self, command: &str) -> OrchestratorResult<CommandStatus>;

    /// Run `program` with `args` passed through verbatim, no shell involved
    async fn run_program(&self, program: &str, args: &[String]) -> OrchestratorResult<CommandStatus>;
}

/// Launches the service under test as a detached child process
#[mockall::automock]
#[async_trait::async_trait]
pub trait ServiceSpawner: Send + Sync {
    /// Spawn the service and return its process id
    ///
    /// The child inherits the environment and standard streams and keeps
    /// running after the spawning process exits.
    async fn spawn(&self, spec: &LaunchSpec) -> OrchestratorResult<u32>;
}

/// Durable storage for the process identity record
#[mockall::automock]
pub trait IdentityStore: Send + Sync {
    /// Where the record lives, for diagnostics
    fn location(&self) -> PathBuf;

    /// Delete any existing record; absent records are not an error
    fn clear(&self) -> OrchestratorResult<()>;

    /// Create or overwrite the record
    fn persist(&self, identity: ProcessIdentity) -> OrchestratorResult<()>;

    /// Read and delete the record in one step
    ///
    /// The record is removed before its content is interpreted, so an
    /// unparseable record is still consumed and reported as an error.
    fn take(&self) -> OrchestratorResult<Option<ProcessIdentity>>;

    /// Read the record without consuming it
    fn peek(&self) -> OrchestratorResult<Option<ProcessIdentity>>;
}

/// One readiness check against the liveness endpoint
#[mockall::automock]
#[async_trait::async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Perform a single request; network failures are reported, never raised
    async fn probe(&self, url: &Url) -> ProbeOutcome;
}

/// Sends the standard termination signal to an owned process
#[mockall::automock]
pub trait ProcessTerminator: Send + Sync {
    fn terminate(&self, pid: u32) -> OrchestratorResult<()>;
}
