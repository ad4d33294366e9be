//! Single-invocation suite runner
//!
//! Setup, the test command, then teardown, for test runners that have no
//! global setup/teardown hooks of their own. Teardown always runs, including
//! after a failed setup, so a spawned service that never became ready is still
//! stopped.

use shared::{PhaseId, logging, phase_error, phase_info};

use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;
use crate::setup::{Setup, SetupOutcome};
use crate::teardown::{Teardown, TeardownOutcome};
use crate::traits::{CommandRunner, CommandStatus, IdentityStore, ProcessTerminator, ReadinessProbe, ServiceSpawner};

/// Exit code reported when setup fails or the test command cannot be launched
pub const SETUP_FAILURE_EXIT_CODE: i32 = 2;

/// Everything that happened during a suite run
#[derive(Debug)]
pub struct SuiteOutcome {
    pub setup: Result<SetupOutcome, OrchestratorError>,
    /// None when setup failed and the tests never ran
    pub tests: Option<Result<CommandStatus, OrchestratorError>>,
    pub teardown: TeardownOutcome,
}

impl SuiteOutcome {
    /// Process exit code for the whole run
    pub fn exit_code(&self) -> i32 {
        match &self.tests {
            Some(Ok(status)) if status.success => 0,
            Some(Ok(status)) => status.code.unwrap_or(1),
            Some(Err(_)) | None => SETUP_FAILURE_EXIT_CODE,
        }
    }
}

/// Run setup, the test command and teardown in order
pub async fn run_suite<R, S, I, P, K, J, T, C>(
    setup: &Setup<R, S, I, P, K>,
    teardown: &Teardown<J, T>,
    config: &OrchestratorConfig,
    tests: &C,
    test_command: &[String],
) -> SuiteOutcome
where
    R: CommandRunner,
    S: ServiceSpawner,
    I: IdentityStore,
    P: ReadinessProbe,
    K: ProcessTerminator,
    J: IdentityStore,
    T: ProcessTerminator,
    C: CommandRunner + ?Sized,
{
    let setup_result = setup.run(config).await;

    let tests_result = match &setup_result {
        Ok(_) => {
            phase_info!(PhaseId::current(), "🧪 Running test command");
            Some(match test_command.split_first() {
                Some((program, args)) => tests.run_program(program, args).await,
                None => Err(OrchestratorError::config("test command", "no program given")),
            })
        }
        Err(e) => {
            logging::log_error(PhaseId::current(), "Setup", e);
            None
        }
    };

    if let Some(Err(e)) = &tests_result {
        phase_error!(PhaseId::current(), "❌ Could not launch test command: {}", e);
    }

    let teardown_outcome = teardown.run();

    SuiteOutcome {
        setup: setup_result,
        tests: tests_result,
        teardown: teardown_outcome,
    }
}
