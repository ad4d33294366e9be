//! Tests for the environment implementations

use crate::services::environment::{MemoryEnvironment, ProcessEnvironment};
use crate::traits::Environment;

#[test]
fn test_memory_environment_roundtrip() {
    let mut env = MemoryEnvironment::new();
    assert!(env.is_empty());
    assert_eq!(env.get("DATABASE_URL"), None);

    env.set("DATABASE_URL", "postgres://localhost/jobs_test");
    assert_eq!(env.get("DATABASE_URL").as_deref(), Some("postgres://localhost/jobs_test"));
    assert_eq!(env.len(), 1);
}

#[test]
fn test_process_environment_sees_existing_variables() {
    // PATH is present in every environment the tests run in
    let env = ProcessEnvironment::new();
    assert!(env.get("PATH").is_some());
    assert_eq!(env.get("E2E_ORCHESTRATOR_SURELY_UNSET_VARIABLE"), None);
}
