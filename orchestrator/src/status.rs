//! Read-only diagnostics: the identity record and one readiness probe

use serde::Serialize;
use shared::ProcessIdentity;
use std::path::PathBuf;
use url::Url;

use crate::traits::{IdentityStore, ProbeOutcome, ReadinessProbe};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub record_path: PathBuf,
    pub record: Option<ProcessIdentity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_error: Option<String>,
    pub health_url: String,
    pub probe: ProbeOutcome,
}

/// Inspect the record without consuming it and probe the service once
pub async fn collect_status<I, P>(store: &I, probe: &P, health_url: &Url) -> StatusReport
where
    I: IdentityStore + ?Sized,
    P: ReadinessProbe + ?Sized,
{
    let (record, record_error) = match store.peek() {
        Ok(record) => (record, None),
        Err(e) => (None, Some(e.to_string())),
    };

    StatusReport {
        record_path: store.location(),
        record,
        record_error,
        health_url: health_url.to_string(),
        probe: probe.probe(health_url).await,
    }
}
