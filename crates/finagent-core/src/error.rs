//! Error types for finagent-core

use thiserror::Error;

/// Result type alias for finagent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type surfaced at the tool-execution boundary
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Tool received parameters that do not match its input schema
    #[error("Invalid tool parameters: {0}")]
    InvalidParameters(String),

    /// Tool execution failed
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}
