//! Minimal HTTP service used as the managed artifact in lifecycle tests
//!
//! Answers `GET /health` with 503 until its startup delay has elapsed, then
//! with 200, so readiness polling sees a service that is reachable but not yet
//! ready before it becomes healthy.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde_json::{Value, json};
use shared::{PhaseId, phase_debug, phase_info};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;

#[derive(Error, Debug)]
pub enum StubError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

pub type StubResult<T> = Result<T, StubError>;

/// Readiness state shared by all requests
#[derive(Debug)]
pub struct StubState {
    started: Instant,
    startup_delay: Duration,
}

impl StubState {
    pub fn new(startup_delay: Duration) -> Self {
        Self {
            started: Instant::now(),
            startup_delay,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.started.elapsed() >= self.startup_delay
    }

    fn remaining(&self) -> Duration {
        self.startup_delay.saturating_sub(self.started.elapsed())
    }
}

pub fn build_router(state: Arc<StubState>) -> Router {
    Router::new().route("/health", get(health_check)).with_state(state)
}

async fn health_check(State(state): State<Arc<StubState>>) -> (StatusCode, Json<Value>) {
    if state.is_ready() {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "uptime_ms": state.started.elapsed().as_millis() as u64,
            })),
        )
    } else {
        phase_debug!(PhaseId::current(), "Health requested while still starting");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "starting",
                "ready_in_ms": state.remaining().as_millis() as u64,
            })),
        )
    }
}

/// Bind the listener for `port` on the loopback interface
pub async fn bind(port: u16) -> StubResult<TcpListener> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpListener::bind(addr)
        .await
        .map_err(|source| StubError::Bind { addr, source })
}

/// Serve until `shutdown` resolves, finishing in-flight requests first
pub async fn serve<F>(listener: TcpListener, state: Arc<StubState>, shutdown: F) -> StubResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        phase_info!(PhaseId::current(), "🌐 Stub service listening on http://{}", addr);
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolves on SIGTERM or Ctrl-C
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            phase_info!(PhaseId::current(), "🛑 Received Ctrl+C");
        }
        _ = terminate => {
            phase_info!(PhaseId::current(), "🛑 Received SIGTERM");
        }
    }
}
