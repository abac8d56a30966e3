//! Error types for language-model operations

use thiserror::Error;

/// Result type for language-model operations
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors that can occur when talking to a model service
#[derive(Error, Debug)]
pub enum LlmError {
    /// API request failed at the transport/API level
    #[error("Model request failed: {0}")]
    RequestFailed(String),

    /// Invalid API key or authentication failed
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Model not found
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Structured output did not conform to the requested schema
    #[error("Model output did not match schema `{schema}`: {detail}")]
    SchemaConformance { schema: String, detail: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
