//! Service process spawner
//!
//! Launches the service artifact as a child process that outlives setup:
//! teardown runs as a separate invocation and finds it again through the
//! persisted identity record.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{LaunchSpec, ServiceSpawner};
use shared::{PhaseId, phase_info};

#[derive(Debug, Default, Clone, Copy)]
pub struct RealServiceSpawner;

impl RealServiceSpawner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceSpawner for RealServiceSpawner {
    async fn spawn(&self, spec: &LaunchSpec) -> OrchestratorResult<u32> {
        let program = spec.program.display().to_string();
        phase_info!(PhaseId::current(), "🚀 Spawning {} {:?}", program, spec.args);

        let child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false)
            .spawn()
            .map_err(|e| OrchestratorError::SpawnFailed {
                program: program.clone(),
                reason: e.to_string(),
            })?;

        let pid = child.id().ok_or_else(|| OrchestratorError::SpawnFailed {
            program: program.clone(),
            reason: "platform returned no process id".to_string(),
        })?;

        // Dropping the handle detaches the child; it keeps running until teardown.
        drop(child);

        phase_info!(PhaseId::current(), "🆔 Service running as pid {}", pid);
        Ok(pid)
    }
}
