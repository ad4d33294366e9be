//! HTTP readiness probe
//!
//! Issues a single `GET` against the liveness endpoint. Any 2xx status means
//! ready; every other status and every transport error means not ready.

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{ProbeOutcome, ReadinessProbe};

/// Per-request timeout so one stalled connection does not eat the whole budget
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct HttpReadinessProbe {
    client: reqwest::Client,
}

impl HttpReadinessProbe {
    pub fn new() -> OrchestratorResult<Self> {
        Self::with_request_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_request_timeout(request_timeout: Duration) -> OrchestratorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| OrchestratorError::config("http client", e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ReadinessProbe for HttpReadinessProbe {
    async fn probe(&self, url: &Url) -> ProbeOutcome {
        match self.client.get(url.clone()).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    ProbeOutcome::Ready {
                        status: status.as_u16(),
                    }
                } else {
                    ProbeOutcome::NotReady {
                        status: status.as_u16(),
                    }
                }
            }
            Err(e) => ProbeOutcome::Unreachable { reason: e.to_string() },
        }
    }
}
