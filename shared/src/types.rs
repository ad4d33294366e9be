//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::errors::SharedError;

/// Global phase identity - set once at startup
static PHASE_ID: OnceLock<PhaseId> = OnceLock::new();

/// Which entry point the current process is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseId {
    Setup,
    Teardown,
    /// Setup, test command and teardown in one invocation
    Runner,
    Status,
    /// The stub service used by lifecycle tests
    Service,
}

impl PhaseId {
    /// Initialize the global phase identity; later calls keep the first value
    pub fn init(phase: PhaseId) -> &'static PhaseId {
        PHASE_ID.get_or_init(|| phase)
    }

    /// Get the global phase identity, falling back to `Runner` when uninitialized
    pub fn current() -> &'static PhaseId {
        PHASE_ID.get().unwrap_or(&PhaseId::Runner)
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseId::Setup => write!(f, "setup"),
            PhaseId::Teardown => write!(f, "teardown"),
            PhaseId::Runner => write!(f, "runner"),
            PhaseId::Status => write!(f, "status"),
            PhaseId::Service => write!(f, "service"),
        }
    }
}

/// How the service under test is provided for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Service already running somewhere; never started or stopped by us
    External,
    /// Service spawned and owned by this orchestrator
    #[default]
    Managed,
}

impl RunMode {
    /// Derive the mode from the "use existing server" flag value
    pub fn from_flag(value: Option<&str>) -> Self {
        if value.is_some_and(flag_enabled) {
            RunMode::External
        } else {
            RunMode::Managed
        }
    }

    /// Suffix used to select the mode-specific overlay env file
    pub fn overlay_suffix(&self) -> &'static str {
        match self {
            RunMode::External => "external",
            RunMode::Managed => "managed",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::External => write!(f, "external"),
            RunMode::Managed => write!(f, "managed"),
        }
    }
}

/// Boolean-like flag parsing: "1", "true" or "yes" (case-insensitive) are true
pub fn flag_enabled(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

/// Sentinel written to the identity record when the service is externally managed
pub const EXTERNAL_SENTINEL: &str = "external";

/// Value of the process identity record shared by setup and teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "pid", rename_all = "lowercase")]
pub enum ProcessIdentity {
    External,
    Managed(u32),
}

impl ProcessIdentity {
    /// Process handle to terminate at teardown, if we own one
    pub fn owned_pid(&self) -> Option<u32> {
        match self {
            ProcessIdentity::External => None,
            ProcessIdentity::Managed(pid) => Some(*pid),
        }
    }
}

impl fmt::Display for ProcessIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessIdentity::External => f.write_str(EXTERNAL_SENTINEL),
            ProcessIdentity::Managed(pid) => write!(f, "{pid}"),
        }
    }
}

impl FromStr for ProcessIdentity {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed == EXTERNAL_SENTINEL {
            return Ok(ProcessIdentity::External);
        }

        match trimmed.parse::<u32>() {
            Ok(pid) if pid > 0 => Ok(ProcessIdentity::Managed(pid)),
            _ => Err(SharedError::InvalidIdentity {
                content: s.to_string(),
            }),
        }
    }
}
