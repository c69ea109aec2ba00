//! Error types for the slingshot engine

use thiserror::Error;

/// Result type for scenario building and configuration
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised at construction time. Degenerate physics never errors;
/// it shows up as an absent result for that frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("unknown body: {0}")]
    UnknownBody(String),
}
