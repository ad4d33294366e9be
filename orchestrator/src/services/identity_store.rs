//! File-backed process identity record
//!
//! A single plain-text file holding either the `external` sentinel or the
//! decimal pid of the spawned service. Writes go through a temporary file and
//! a rename so a concurrent reader never sees a partial record.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use shared::{PhaseId, ProcessIdentity, phase_debug};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::IdentityStore;

/// Directory, relative to this crate, holding the record
pub const STATE_DIR: &str = ".e2e";
pub const RECORD_FILE: &str = "service.pid";

#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fixed record location next to the orchestrator crate
    pub fn default_location() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(STATE_DIR).join(RECORD_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record_error(&self, operation: &'static str, source: std::io::Error) -> OrchestratorError {
        OrchestratorError::IdentityRecordError {
            path: self.path.display().to_string(),
            operation,
            source,
        }
    }

    fn read_raw(&self) -> OrchestratorResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.record_error("read", e)),
        }
    }

    fn remove(&self) -> OrchestratorResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.record_error("delete", e)),
        }
    }
}

impl Default for FileIdentityStore {
    fn default() -> Self {
        Self::new(Self::default_location())
    }
}

impl IdentityStore for FileIdentityStore {
    fn location(&self) -> PathBuf {
        self.path.clone()
    }

    fn clear(&self) -> OrchestratorResult<()> {
        if self.remove()? {
            phase_debug!(PhaseId::current(), "🧹 Removed stale identity record {}", self.path.display());
        }
        Ok(())
    }

    fn persist(&self, identity: ProcessIdentity) -> OrchestratorResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.record_error("create directory", e))?;
        }

        let tmp = self.path.with_extension("pid.tmp");
        fs::write(&tmp, identity.to_string()).map_err(|e| self.record_error("write", e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.record_error("write", e))?;

        phase_debug!(
            PhaseId::current(),
            "💾 Persisted identity {} to {}",
            identity,
            self.path.display()
        );
        Ok(())
    }

    fn take(&self) -> OrchestratorResult<Option<ProcessIdentity>> {
        let Some(content) = self.read_raw()? else {
            return Ok(None);
        };
        self.remove()?;

        Ok(Some(content.parse()?))
    }

    fn peek(&self) -> OrchestratorResult<Option<ProcessIdentity>> {
        match self.read_raw()? {
            Some(content) => Ok(Some(content.parse()?)),
            None => Ok(None),
        }
    }
}
