//! Service implementations
//!
//! This module contains real implementations of all service traits.
//! These are the production implementations that handle actual I/O operations.

pub mod environment;
pub mod http_probe;
pub mod identity_store;
pub mod shell;
pub mod spawner;
pub mod terminator;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use environment::{MemoryEnvironment, ProcessEnvironment};
pub use http_probe::HttpReadinessProbe;
pub use identity_store::FileIdentityStore;
pub use shell::RealCommandRunner;
pub use spawner::RealServiceSpawner;
pub use terminator::SignalTerminator;
