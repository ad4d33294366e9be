//! Orchestrator-specific error types

use shared::SharedError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// External command the orchestrator depends on before spawning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionStep {
    Build,
    Migrate,
}

impl fmt::Display for PreconditionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreconditionStep::Build => write!(f, "build"),
            PreconditionStep::Migrate => write!(f, "migration"),
        }
    }
}

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Configuration error: {field}: {message}")]
    ConfigurationError { field: String, message: String },

    #[error("Failed to load env file {path}: {message}")]
    EnvFileError { path: String, message: String },

    #[error("The {step} command `{command}` failed with {status}")]
    PreconditionFailed {
        step: PreconditionStep,
        command: String,
        status: String,
    },

    #[error("Service artifact {path} is still missing after a successful build")]
    ArtifactMissing { path: String },

    #[error("Failed to launch command `{command}`: {source}")]
    CommandLaunchError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn service process {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Service at {url} did not become ready within {timeout:?} ({attempts} attempts)")]
    ReadinessTimeout {
        url: String,
        timeout: Duration,
        attempts: u32,
    },

    #[error("Process identity record {operation} failed for {path}: {source}")]
    IdentityRecordError {
        path: String,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to terminate process {pid}: {reason}")]
    TerminationFailed { pid: u32, reason: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),
}

impl OrchestratorError {
    /// Configuration error for a named key or setting
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        OrchestratorError::ConfigurationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for failures that happened before any process was spawned
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            OrchestratorError::PreconditionFailed { .. }
                | OrchestratorError::ArtifactMissing { .. }
                | OrchestratorError::CommandLaunchError { .. }
        )
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
