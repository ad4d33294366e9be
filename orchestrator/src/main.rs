//! Main entry point for the orchestrator binary
//!
//! `setup` and `teardown` are meant to be wired into a test runner's global
//! hooks; `run` wraps a test command with both; `status` prints diagnostics.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use orchestrator::{
    OrchestratorConfig, OrchestratorResult, Setup, Teardown, TeardownOutcome, collect_status, prepare_environment,
    run_suite,
    services::{
        FileIdentityStore, HttpReadinessProbe, ProcessEnvironment, RealCommandRunner, RealServiceSpawner,
        SignalTerminator,
    },
};
use shared::{PhaseId, logging, phase_info};

/// Lifecycle management for the service under e2e test
#[derive(Parser)]
#[command(name = "orchestrator")]
#[command(about = "Starts, waits for and stops the service under e2e test")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Identity record location (defaults to .e2e/service.pid next to this crate)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prepare the environment, start or locate the service, wait until ready
    Setup,
    /// Stop the service started by setup, if this orchestrator owns it
    Teardown,
    /// Setup, run the given test program with its arguments, teardown; exits with the tests' code
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        test_command: Vec<String>,
    },
    /// Print the identity record and one readiness probe as JSON
    Status,
}

impl Command {
    fn phase(&self) -> PhaseId {
        match self {
            Command::Setup => PhaseId::Setup,
            Command::Teardown => PhaseId::Teardown,
            Command::Run { .. } => PhaseId::Runner,
            Command::Status => PhaseId::Status,
        }
    }
}

// Environment preparation mutates the process environment: keep a single thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    PhaseId::init(args.command.phase());
    logging::init_tracing(Some(&args.log_level));

    let store = args.state_file.map(FileIdentityStore::new).unwrap_or_default();

    match args.command {
        Command::Setup => {
            let config = resolve_config().context("Invalid e2e configuration")?;
            let setup = Setup::new(
                RealCommandRunner::new(),
                RealServiceSpawner::new(),
                store,
                HttpReadinessProbe::new()?,
                SignalTerminator::new(),
            );
            let outcome = setup.run(&config).await.context("e2e setup failed")?;
            phase_info!(
                PhaseId::current(),
                "🏁 Setup complete: {} after {} probe attempts",
                outcome.identity,
                outcome.attempts
            );
        }
        Command::Teardown => {
            let outcome = Teardown::new(store, SignalTerminator::new()).run();
            if outcome != TeardownOutcome::NoRecord {
                phase_info!(PhaseId::current(), "🏁 Teardown complete: {:?}", outcome);
            }
        }
        Command::Run { test_command } => {
            let config = resolve_config().context("Invalid e2e configuration")?;
            let setup = Setup::new(
                RealCommandRunner::new(),
                RealServiceSpawner::new(),
                store.clone(),
                HttpReadinessProbe::new()?,
                SignalTerminator::new(),
            );
            let teardown = Teardown::new(store, SignalTerminator::new());

            let outcome = run_suite(
                &setup,
                &teardown,
                &config,
                &RealCommandRunner::new(),
                &test_command,
            )
            .await;

            let code = outcome.exit_code();
            phase_info!(PhaseId::current(), "🏁 Suite finished with exit code {}", code);
            if code != 0 {
                std::process::exit(code);
            }
        }
        Command::Status => {
            let config = resolve_config().context("Invalid e2e configuration")?;
            let probe = HttpReadinessProbe::new()?;
            let report = collect_status(&store, &probe, &config.health_url()).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

/// Resolve the run mode, apply the env file layers and read the configuration
fn resolve_config() -> OrchestratorResult<OrchestratorConfig> {
    let mut env = ProcessEnvironment::new();
    let prepared = prepare_environment(&mut env)?;
    OrchestratorConfig::from_env(&env, prepared.mode)
}
