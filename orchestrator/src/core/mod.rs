//! Core orchestration logic independent of any concrete I/O
//!
//! Environment layering and the readiness polling loop; both operate purely
//! through the traits in [`crate::traits`].

pub mod env_layers;
pub mod readiness;

pub use env_layers::{EnvLayer, LayerReport, PreparedEnvironment, apply_layers, prepare_environment};
pub use readiness::{ReadinessPolicy, ReadyReport, wait_until_ready};
