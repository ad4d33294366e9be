//! Readiness polling loop
//!
//! Polls the liveness endpoint at a fixed interval until it answers with a
//! success status or the overall bound is exceeded. Unreachable endpoints and
//! non-success statuses both mean "not ready yet".

use shared::{PhaseId, phase_debug, phase_info};
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};
use url::Url;

use crate::config::{DEFAULT_POLL_INTERVAL, DEFAULT_READY_TIMEOUT};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{ProbeOutcome, ReadinessProbe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_READY_TIMEOUT,
        }
    }
}

/// Summary of a successful wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyReport {
    pub attempts: u32,
    pub elapsed: Duration,
    pub status: u16,
}

/// Poll `url` until ready or until `policy.timeout` has elapsed
///
/// The first attempt is made immediately. A single attempt is cut off once the
/// overall bound is reached, so a hung connection cannot extend the wait.
pub async fn wait_until_ready<P: ReadinessProbe + ?Sized>(
    probe: &P,
    url: &Url,
    policy: &ReadinessPolicy,
) -> OrchestratorResult<ReadyReport> {
    let start = Instant::now();
    let mut attempts = 0u32;

    phase_info!(
        PhaseId::current(),
        "⏳ Waiting for {} (interval {:?}, timeout {:?})",
        url,
        policy.interval,
        policy.timeout
    );

    loop {
        attempts += 1;

        let remaining = policy.timeout.saturating_sub(start.elapsed());
        let budget = remaining.max(policy.interval);
        let outcome = match timeout(budget, probe.probe(url)).await {
            Ok(outcome) => outcome,
            Err(_) => ProbeOutcome::Unreachable {
                reason: format!("no response within {budget:?}"),
            },
        };

        match outcome {
            ProbeOutcome::Ready { status } => {
                let elapsed = start.elapsed();
                phase_info!(
                    PhaseId::current(),
                    "✅ Service ready after {} attempts ({:?})",
                    attempts,
                    elapsed
                );
                return Ok(ReadyReport {
                    attempts,
                    elapsed,
                    status,
                });
            }
            ProbeOutcome::NotReady { status } => {
                phase_debug!(PhaseId::current(), "Attempt {}: HTTP {}", attempts, status);
            }
            ProbeOutcome::Unreachable { reason } => {
                phase_debug!(PhaseId::current(), "Attempt {}: unreachable ({})", attempts, reason);
            }
        }

        if start.elapsed() >= policy.timeout {
            return Err(OrchestratorError::ReadinessTimeout {
                url: url.to_string(),
                timeout: policy.timeout,
                attempts,
            });
        }

        sleep(policy.interval).await;
    }
}
