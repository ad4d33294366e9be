//! Shared logging utilities for consistent tracing across setup, teardown and the stub service

use crate::types::PhaseId;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Build the filter directive for the current phase
///
/// The orchestrator and its shared crate log at `level`; HTTP client and server
/// internals are kept quiet unless explicitly asked for through `RUST_LOG`.
pub fn filter_directive(phase: &PhaseId, level: &str) -> String {
    match phase {
        PhaseId::Service => {
            format!("stub_service={level},shared={level},tower_http=warn,axum=warn,hyper=warn")
        }
        _ => format!("orchestrator={level},shared={level},reqwest=warn,hyper=warn"),
    }
}

/// Initialize tracing subscriber for the current phase with the given level
///
/// `RUST_LOG`, when set, replaces the phase defaults entirely.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let base_level = log_level.unwrap_or("info");
    let directive = filter_directive(PhaseId::current(), base_level);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    // try_init: tests may install a subscriber more than once per process
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for phase-aware info logging
#[macro_export]
macro_rules! phase_info {
    ($phase:expr, $($arg:tt)*) => {
        tracing::info!(
            phase = %$phase,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for phase-aware warning logging
#[macro_export]
macro_rules! phase_warn {
    ($phase:expr, $($arg:tt)*) => {
        tracing::warn!(
            phase = %$phase,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for phase-aware error logging
#[macro_export]
macro_rules! phase_error {
    ($phase:expr, $($arg:tt)*) => {
        tracing::error!(
            phase = %$phase,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for phase-aware debug logging
#[macro_export]
macro_rules! phase_debug {
    ($phase:expr, $($arg:tt)*) => {
        tracing::debug!(
            phase = %$phase,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(phase: &PhaseId, details: &str) {
    info!(
        phase = %phase,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(phase: &PhaseId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        phase = %phase,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(phase: &PhaseId, message: &str) {
    info!(
        phase = %phase,
        timestamp = format_timestamp(),
        "✅ {}",
        message
    );
}
