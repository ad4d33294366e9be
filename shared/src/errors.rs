//! Shared error types for the e2e orchestration workspace

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Invalid process identity record: {content:?}")]
    InvalidIdentity { content: String },
}
