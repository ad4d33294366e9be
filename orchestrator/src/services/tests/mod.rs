//! Service-specific tests
//!
//! One file per real service implementation, exercising actual files,
//! processes and HTTP endpoints.

mod environment;

// Common test utilities for services
pub mod common {
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Identity record path inside a fresh temporary directory
    pub fn temp_record() -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join(".e2e").join("service.pid");
        (dir, path)
    }
}
