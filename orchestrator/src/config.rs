//! Orchestrator configuration
//!
//! Everything setup needs is read from the (already layered) environment.
//! Only the mode flag and the primary env file path are read before the env
//! files are applied; see [`crate::core::env_layers`].

use shared::RunMode;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::core::readiness::ReadinessPolicy;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{Environment, LaunchSpec};

/// Environment variable names consumed by the orchestrator
pub mod keys {
    /// Truthy value selects external mode
    pub const USE_EXISTING_SERVER: &str = "E2E_USE_EXISTING_SERVER";
    pub const ENV_FILE: &str = "E2E_ENV_FILE";
    pub const BASE_URL: &str = "E2E_BASE_URL";
    pub const SERVICE_BIN: &str = "E2E_SERVICE_BIN";
    pub const SERVICE_ARGS: &str = "E2E_SERVICE_ARGS";
    pub const BUILD_CMD: &str = "E2E_BUILD_CMD";
    pub const MIGRATE_CMD: &str = "E2E_MIGRATE_CMD";
    pub const READY_TIMEOUT_MS: &str = "E2E_READY_TIMEOUT_MS";
    pub const POLL_INTERVAL_MS: &str = "E2E_POLL_INTERVAL_MS";
}

pub const DEFAULT_ENV_FILE: &str = ".env.test";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_SERVICE_BIN: &str = "target/release/job-board-api";
pub const DEFAULT_BUILD_CMD: &str = "cargo build --release";
pub const DEFAULT_MIGRATE_CMD: &str = "cargo run --release --bin migrate";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Liveness endpoint path appended to the base URL
pub const HEALTH_PATH: &str = "health";

/// Fully resolved configuration for one setup run
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub mode: RunMode,
    pub base_url: Url,
    pub service: LaunchSpec,
    pub build_command: String,
    pub migrate_command: String,
    pub readiness: ReadinessPolicy,
}

impl OrchestratorConfig {
    /// Configuration with default commands, artifact and readiness policy
    pub fn new(mode: RunMode, base_url: Url) -> Self {
        Self {
            mode,
            base_url,
            service: LaunchSpec {
                program: PathBuf::from(DEFAULT_SERVICE_BIN),
                args: Vec::new(),
            },
            build_command: DEFAULT_BUILD_CMD.to_string(),
            migrate_command: DEFAULT_MIGRATE_CMD.to_string(),
            readiness: ReadinessPolicy::default(),
        }
    }

    /// Read the configuration for `mode` from the layered environment
    pub fn from_env<E: Environment + ?Sized>(env: &E, mode: RunMode) -> OrchestratorResult<Self> {
        let base_url = match env.get(keys::BASE_URL) {
            Some(raw) => parse_base_url(&raw)?,
            None => parse_base_url(DEFAULT_BASE_URL)?,
        };

        let mut config = Self::new(mode, base_url);

        if let Some(program) = non_empty(env.get(keys::SERVICE_BIN)) {
            config.service.program = PathBuf::from(program);
        }
        if let Some(args) = env.get(keys::SERVICE_ARGS) {
            config.service.args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(command) = non_empty(env.get(keys::BUILD_CMD)) {
            config.build_command = command;
        }
        if let Some(command) = non_empty(env.get(keys::MIGRATE_CMD)) {
            config.migrate_command = command;
        }
        if let Some(interval) = read_millis(env, keys::POLL_INTERVAL_MS)? {
            config.readiness.interval = interval;
        }
        if let Some(timeout) = read_millis(env, keys::READY_TIMEOUT_MS)? {
            config.readiness.timeout = timeout;
        }

        if config.readiness.interval.is_zero() {
            return Err(OrchestratorError::config(
                keys::POLL_INTERVAL_MS,
                "poll interval must be greater than zero",
            ));
        }

        Ok(config)
    }

    /// The readiness probe target: `<base>/health`
    pub fn health_url(&self) -> Url {
        health_url(&self.base_url)
    }

    /// Override the service launch spec (fluent API)
    pub fn with_service(mut self, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        self.service = LaunchSpec {
            program: program.into(),
            args,
        };
        self
    }

    /// Override the precondition commands (fluent API)
    pub fn with_commands(mut self, build: impl Into<String>, migrate: impl Into<String>) -> Self {
        self.build_command = build.into();
        self.migrate_command = migrate.into();
        self
    }

    /// Override the readiness policy (fluent API)
    pub fn with_readiness(mut self, interval: Duration, timeout: Duration) -> Self {
        self.readiness = ReadinessPolicy { interval, timeout };
        self
    }
}

/// Append the liveness path to `base`, keeping any path prefix it already has
pub fn health_url(base: &Url) -> Url {
    let mut url = base.clone();
    let prefix = base.path().trim_end_matches('/');
    url.set_path(&format!("{prefix}/{HEALTH_PATH}"));
    url.set_query(None);
    url.set_fragment(None);
    url
}

fn parse_base_url(raw: &str) -> OrchestratorResult<Url> {
    let url = Url::parse(raw.trim())
        .map_err(|e| OrchestratorError::config(keys::BASE_URL, format!("invalid URL {raw:?}: {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(OrchestratorError::config(
            keys::BASE_URL,
            format!("unsupported scheme {other:?}, expected http or https"),
        )),
    }
}

fn read_millis<E: Environment + ?Sized>(env: &E, key: &str) -> OrchestratorResult<Option<Duration>> {
    match non_empty(env.get(key)) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(|ms| Some(Duration::from_millis(ms)))
            .map_err(|_| OrchestratorError::config(key, format!("expected milliseconds, got {raw:?}"))),
        None => Ok(None),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
