//! Teardown phase
//!
//! One pass, never fails: no record means nothing to do; otherwise the record
//! is consumed (read and deleted) before any termination attempt, and a
//! process that is already gone counts as cleaned up.

use shared::{PhaseId, phase_debug, phase_info, phase_warn};

use crate::error::OrchestratorError;
use crate::traits::{IdentityStore, ProcessTerminator};

/// What teardown found and did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// No record: setup never ran or teardown already happened
    NoRecord,
    /// Record could not be read or parsed; it has been discarded
    UnreadableRecord { reason: String },
    /// Service was externally managed; left alone
    External,
    /// Termination signal delivered
    Terminated { pid: u32 },
    /// Signal could not be delivered (already exited, permission denied, ...)
    TerminationSkipped { pid: u32, reason: String },
}

/// Teardown phase with injected services
pub struct Teardown<I, T>
where
    I: IdentityStore,
    T: ProcessTerminator,
{
    store: I,
    terminator: T,
}

impl<I, T> Teardown<I, T>
where
    I: IdentityStore,
    T: ProcessTerminator,
{
    pub fn new(store: I, terminator: T) -> Self {
        Self { store, terminator }
    }

    /// Consume the identity record and stop the owned process, if any
    pub fn run(&self) -> TeardownOutcome {
        let identity = match self.store.take() {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                phase_debug!(PhaseId::current(), "No identity record at {}", self.store.location().display());
                return TeardownOutcome::NoRecord;
            }
            Err(e) => {
                // take() removes the file before parsing; a read failure may leave it behind
                if matches!(e, OrchestratorError::IdentityRecordError { .. }) {
                    if let Err(clear_error) = self.store.clear() {
                        phase_warn!(PhaseId::current(), "⚠️ Identity record left in place: {}", clear_error);
                    }
                }
                phase_warn!(PhaseId::current(), "⚠️ Discarding identity record: {}", e);
                return TeardownOutcome::UnreadableRecord { reason: e.to_string() };
            }
        };

        match identity.owned_pid() {
            None => {
                phase_info!(PhaseId::current(), "🔗 Service is externally managed, leaving it running");
                TeardownOutcome::External
            }
            Some(pid) => match self.terminator.terminate(pid) {
                Ok(()) => {
                    phase_info!(PhaseId::current(), "🛑 Stopped service process {}", pid);
                    TeardownOutcome::Terminated { pid }
                }
                Err(e) => {
                    phase_debug!(PhaseId::current(), "Termination of {} skipped: {}", pid, e);
                    let reason = match e {
                        OrchestratorError::TerminationFailed { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    TeardownOutcome::TerminationSkipped { pid, reason }
                }
            },
        }
    }
}
