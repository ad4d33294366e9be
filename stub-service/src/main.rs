//! Stub service entry point
//!
//! Spawned by the orchestrator during lifecycle tests in place of the real
//! service under test.

use clap::Parser;
use shared::{PhaseId, logging, phase_info};
use std::sync::Arc;
use std::time::Duration;

use stub_service::{StubResult, StubState, bind, serve, shutdown_signal};

#[derive(Parser, Debug)]
#[command(name = "stub-service")]
#[command(about = "Health-check-only service for e2e lifecycle tests")]
struct Args {
    /// Port for the HTTP server
    #[arg(long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Answer /health with 503 for this long after startup
    #[arg(long, default_value = "0")]
    startup_delay_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> StubResult<()> {
    let args = Args::parse();

    PhaseId::init(PhaseId::Service);
    logging::init_tracing(Some(&args.log_level));

    logging::log_startup(PhaseId::current(), &format!("stub service on port {}", args.port));
    if args.startup_delay_ms > 0 {
        phase_info!(PhaseId::current(), "⏳ Reporting not ready for {}ms", args.startup_delay_ms);
    }

    let state = Arc::new(StubState::new(Duration::from_millis(args.startup_delay_ms)));
    let listener = bind(args.port).await?;

    if let Err(e) = serve(listener, state, shutdown_signal()).await {
        logging::log_error(PhaseId::current(), "Stub service", &e);
        return Err(e);
    }

    logging::log_success(PhaseId::current(), "Stub service stopped gracefully");
    Ok(())
}
