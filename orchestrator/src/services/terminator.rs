//! Process termination
//!
//! Sends the standard termination signal (SIGTERM) to an owned process. No
//! escalation to a forced kill: the service is expected to shut down on its own.

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::ProcessTerminator;
use shared::{PhaseId, phase_debug};

#[derive(Debug, Default, Clone, Copy)]
pub struct SignalTerminator;

impl SignalTerminator {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTerminator for SignalTerminator {
    #[cfg(unix)]
    fn terminate(&self, pid: u32) -> OrchestratorResult<()> {
        use nix::errno::Errno;
        use nix::sys::signal::{self, Signal};
        use nix::unistd::Pid;

        let raw = i32::try_from(pid)
            .ok()
            .filter(|raw| *raw > 0)
            .ok_or_else(|| OrchestratorError::TerminationFailed {
                pid,
                reason: "not a valid process id".to_string(),
            })?;

        match signal::kill(Pid::from_raw(raw), Signal::SIGTERM) {
            Ok(()) => {
                phase_debug!(PhaseId::current(), "📤 Sent SIGTERM to process {}", pid);
                Ok(())
            }
            Err(Errno::ESRCH) => Err(OrchestratorError::TerminationFailed {
                pid,
                reason: "process already exited".to_string(),
            }),
            Err(e) => Err(OrchestratorError::TerminationFailed {
                pid,
                reason: e.to_string(),
            }),
        }
    }

    #[cfg(not(unix))]
    fn terminate(&self, pid: u32) -> OrchestratorResult<()> {
        // taskkill without /F asks the process to close instead of killing it
        let status = std::process::Command::new("taskkill")
            .args(["/PID", &pid.to_string()])
            .status()
            .map_err(|e| OrchestratorError::TerminationFailed {
                pid,
                reason: e.to_string(),
            })?;

        if status.success() {
            phase_debug!(PhaseId::current(), "📤 Requested termination of process {}", pid);
            Ok(())
        } else {
            Err(OrchestratorError::TerminationFailed {
                pid,
                reason: format!("taskkill exited with {status}"),
            })
        }
    }
}
