//! Layered environment loading
//!
//! Layers are applied in order and never override a key that is already set,
//! either by the pre-existing process environment or by an earlier layer.
//! The first writer wins.

use shared::{PhaseId, RunMode, phase_debug, phase_info};
use std::path::{Path, PathBuf};

use crate::config::{DEFAULT_ENV_FILE, keys};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::Environment;

/// One env file in the layering order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLayer {
    pub path: PathBuf,
    /// Missing required layers are a configuration error; optional ones are skipped
    pub required: bool,
}

impl EnvLayer {
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: true,
        }
    }

    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            required: false,
        }
    }
}

/// What happened to each layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerReport {
    /// Layers that were read, with the number of keys they actually set
    pub applied: Vec<(PathBuf, usize)>,
    /// Optional layers that did not exist
    pub skipped: Vec<PathBuf>,
}

/// Outcome of environment preparation at the start of setup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEnvironment {
    pub mode: RunMode,
    pub layers: LayerReport,
}

/// Fixed overlay file name for a run mode
pub fn overlay_file(mode: RunMode) -> PathBuf {
    PathBuf::from(format!(".env.e2e.{}", mode.overlay_suffix()))
}

/// Resolve the run mode and apply the primary and mode overlay env files
///
/// The mode flag and the primary file override are read from the environment
/// as it was before any file is applied.
pub fn prepare_environment<E: Environment + ?Sized>(env: &mut E) -> OrchestratorResult<PreparedEnvironment> {
    let mode = RunMode::from_flag(env.get(keys::USE_EXISTING_SERVER).as_deref());

    let primary = match env.get(keys::ENV_FILE).filter(|p| !p.trim().is_empty()) {
        Some(path) => EnvLayer::required(path),
        None => EnvLayer::optional(DEFAULT_ENV_FILE),
    };
    let overlay = EnvLayer::optional(overlay_file(mode));

    phase_info!(PhaseId::current(), "🧭 Run mode: {}", mode);

    let layers = apply_layers(env, &[primary, overlay])?;
    Ok(PreparedEnvironment { mode, layers })
}

/// Apply env file layers in order without overriding keys that are already set
pub fn apply_layers<E: Environment + ?Sized>(env: &mut E, layers: &[EnvLayer]) -> OrchestratorResult<LayerReport> {
    let mut report = LayerReport::default();

    for layer in layers {
        if !layer.path.exists() {
            if layer.required {
                return Err(OrchestratorError::config(
                    keys::ENV_FILE,
                    format!("env file {} does not exist", layer.path.display()),
                ));
            }
            phase_debug!(PhaseId::current(), "⏭️ Env file {} not found, skipping", layer.path.display());
            report.skipped.push(layer.path.clone());
            continue;
        }

        // Parse the whole file before touching the environment
        let entries = read_env_file(&layer.path)?;

        let mut applied = 0;
        for (key, value) in entries {
            if env.get(&key).is_none() {
                env.set(&key, &value);
                applied += 1;
            }
        }

        phase_debug!(
            PhaseId::current(),
            "📄 Applied {} keys from {}",
            applied,
            layer.path.display()
        );
        report.applied.push((layer.path.clone(), applied));
    }

    Ok(report)
}

fn read_env_file(path: &Path) -> OrchestratorResult<Vec<(String, String)>> {
    let env_file_error = |e: dotenv::Error| OrchestratorError::EnvFileError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    dotenv::from_path_iter(path)
        .map_err(env_file_error)?
        .map(|item| item.map_err(env_file_error))
        .collect()
}
