//! Shared types for the e2e orchestration workspace
//!
//! Contains the types that cross the setup/teardown boundary (run mode and the
//! persisted process identity) plus the logging helpers every binary uses.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
