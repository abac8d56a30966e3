//! Error types for filing pipeline operations

use thiserror::Error;

/// Filing pipeline specific errors
#[derive(Debug, Error)]
pub enum FilingsError {
    /// Item identifier not present in the catalog
    #[error("Unknown item code `{code}`. Must be one of: {allowed}")]
    UnknownItem { code: String, allowed: String },

    /// Explicit item-code list contained identifiers outside the catalog
    #[error("Invalid item codes: {invalid:?}. Must be one of: {allowed}")]
    InvalidItemCodes {
        invalid: Vec<String>,
        allowed: String,
    },

    /// No filing of the requested form exists for the ticker
    #[error("No {form} filing found for {ticker}")]
    NoFilingFound { ticker: String, form: String },

    /// Filing does not contain the requested section
    #[error("Section {code} not present in {form} filing for {ticker}")]
    SectionUnavailable {
        code: String,
        ticker: String,
        form: String,
    },

    /// Language-model call failed (transport or schema conformance)
    #[error("Model error: {0}")]
    Model(#[from] finagent_llm::LlmError),

    /// Market/peer data fetch failed for one ticker
    ///
    /// Recovered locally in the peer aggregator, fatal everywhere else.
    #[error("Upstream data error for {ticker}: {reason}")]
    UpstreamData { ticker: String, reason: String },

    /// API request failed
    #[error("API error: {0}")]
    Api(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for filing operations
pub type Result<T> = std::result::Result<T, FilingsError>;

/// Convert FilingsError to finagent_core::Error at the tool boundary
impl From<FilingsError> for finagent_core::Error {
    fn from(err: FilingsError) -> Self {
        finagent_core::Error::ExecutionFailed(err.to_string())
    }
}
