//! Command runner: build and migration commands go through the platform
//! shell, the test suite's argv is executed directly

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{CommandRunner, CommandStatus};
use shared::{PhaseId, phase_debug, phase_info};

/// Runs commands with inherited stdio
#[derive(Debug, Default, Clone)]
pub struct RealCommandRunner {
    working_dir: Option<PathBuf>,
}

impl RealCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands from a specific directory (fluent API)
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Wait for `cmd` with inherited stdio; `display` names it in errors and logs
    async fn execute(&self, mut cmd: Command, display: &str) -> OrchestratorResult<CommandStatus> {
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        let status = cmd
            .status()
            .await
            .map_err(|source| OrchestratorError::CommandLaunchError {
                command: display.to_string(),
                source,
            })?;

        let status = CommandStatus {
            success: status.success(),
            code: status.code(),
        };
        let command_display = display;
        phase_debug!(PhaseId::current(), "`{}` finished with {}", command_display, status);
        Ok(status)
    }

    fn shell_command(command: &str) -> Command {
        #[cfg(unix)]
        {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }

        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        }
    }
}

#[async_trait]
impl CommandRunner for RealCommandRunner {
    async fn run(&self, command: &str) -> OrchestratorResult<CommandStatus> {
        phase_info!(PhaseId::current(), "▶️ Running `{}`", command);
        self.execute(Self::shell_command(command), command).await
    }

    async fn run_program(&self, program: &str, args: &[String]) -> OrchestratorResult<CommandStatus> {
        let display = std::iter::once(program)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        phase_info!(PhaseId::current(), "▶️ Running {} {:?}", program, args);

        let mut cmd = Command::new(program);
        cmd.args(args);
        self.execute(cmd, &display).await
    }
}
