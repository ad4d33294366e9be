//! Setup phase
//!
//! Runs once before any test executes. Clears a stale identity record, then
//! either records the externally managed service or builds, migrates and spawns
//! a fresh one, and finally blocks until the liveness endpoint answers.
//!
//! The identity record is persisted before readiness polling starts, so a
//! timeout (or a killed test runner) still leaves teardown something to clean up.
//! A spawned process whose identity cannot be recorded is stopped right away,
//! since no later teardown could find it.

use shared::{PhaseId, ProcessIdentity, RunMode, logging, phase_error, phase_info, phase_warn};
use std::time::Duration;

use crate::config::OrchestratorConfig;
use crate::core::readiness::wait_until_ready;
use crate::error::{OrchestratorError, OrchestratorResult, PreconditionStep};
use crate::traits::{CommandRunner, IdentityStore, ProcessTerminator, ReadinessProbe, ServiceSpawner};

/// Result of a successful setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupOutcome {
    pub mode: RunMode,
    pub identity: ProcessIdentity,
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Setup phase with injected services
pub struct Setup<R, S, I, P, T>
where
    R: CommandRunner,
    S: ServiceSpawner,
    I: IdentityStore,
    P: ReadinessProbe,
    T: ProcessTerminator,
{
    runner: R,
    spawner: S,
    store: I,
    probe: P,
    terminator: T,
}

impl<R, S, I, P, T> Setup<R, S, I, P, T>
where
    R: CommandRunner,
    S: ServiceSpawner,
    I: IdentityStore,
    P: ReadinessProbe,
    T: ProcessTerminator,
{
    /// Create new setup phase with injected dependencies
    pub fn new(runner: R, spawner: S, store: I, probe: P, terminator: T) -> Self {
        Self {
            runner,
            spawner,
            store,
            probe,
            terminator,
        }
    }

    /// Run the whole setup phase for `config`
    pub async fn run(&self, config: &OrchestratorConfig) -> OrchestratorResult<SetupOutcome> {
        logging::log_startup(PhaseId::current(), &format!("e2e setup ({} mode)", config.mode));

        self.store.clear()?;

        let identity = match config.mode {
            RunMode::External => {
                phase_info!(PhaseId::current(), "🔗 Using existing service at {}", config.base_url);
                ProcessIdentity::External
            }
            RunMode::Managed => self.launch(config).await?,
        };
        if let Err(e) = self.store.persist(identity) {
            if let Some(pid) = identity.owned_pid() {
                self.stop_unrecorded(pid);
            }
            return Err(e);
        }

        let report = wait_until_ready(&self.probe, &config.health_url(), &config.readiness).await?;

        logging::log_success(PhaseId::current(), &format!("Service ready at {}", config.base_url));
        Ok(SetupOutcome {
            mode: config.mode,
            identity,
            attempts: report.attempts,
            elapsed: report.elapsed,
        })
    }

    /// Ensure the artifact and schema exist, then spawn the service
    async fn launch(&self, config: &OrchestratorConfig) -> OrchestratorResult<ProcessIdentity> {
        self.ensure_artifact(config).await?;
        self.run_precondition(PreconditionStep::Migrate, &config.migrate_command)
            .await?;

        let pid = self.spawner.spawn(&config.service).await?;
        if pid == 0 {
            return Err(OrchestratorError::SpawnFailed {
                program: config.service.program.display().to_string(),
                reason: "platform returned an unusable process id".to_string(),
            });
        }

        Ok(ProcessIdentity::Managed(pid))
    }

    /// Build the service artifact when it does not exist yet
    async fn ensure_artifact(&self, config: &OrchestratorConfig) -> OrchestratorResult<()> {
        let artifact = &config.service.program;
        if artifact.exists() {
            phase_info!(PhaseId::current(), "📦 Using existing artifact {}", artifact.display());
            return Ok(());
        }

        phase_info!(PhaseId::current(), "🔨 Artifact {} missing, building", artifact.display());
        self.run_precondition(PreconditionStep::Build, &config.build_command)
            .await?;

        if !artifact.exists() {
            return Err(OrchestratorError::ArtifactMissing {
                path: artifact.display().to_string(),
            });
        }
        Ok(())
    }

    /// Best-effort stop of a spawned process that has no identity record
    fn stop_unrecorded(&self, pid: u32) {
        match self.terminator.terminate(pid) {
            Ok(()) => {
                phase_warn!(PhaseId::current(), "🛑 Stopped unrecorded service process {}", pid);
            }
            Err(e) => {
                phase_error!(PhaseId::current(), "❌ Unrecorded service process {} may still be running: {}", pid, e);
            }
        }
    }

    async fn run_precondition(&self, step: PreconditionStep, command: &str) -> OrchestratorResult<()> {
        let status = self.runner.run(command).await?;
        if !status.success {
            return Err(OrchestratorError::PreconditionFailed {
                step,
                command: command.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}
