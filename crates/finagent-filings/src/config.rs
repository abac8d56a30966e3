//! Configuration for filing and market data operations

use crate::error::{FilingsError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_SEC_IDENTITY: &str = "finagent (finagent@example.com)";

/// Configuration for filing and market data operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingsConfig {
    /// Identity sent in the `User-Agent` header on SEC requests
    pub sec_user_agent: String,

    /// Finnhub API key, required for market data operations
    pub finnhub_api_key: Option<String>,

    /// Request timeout for upstream API calls
    pub request_timeout: Duration,

    /// SEC request budget per second
    pub sec_requests_per_second: u32,

    /// Number of EPS surprise quarters fetched per ticker
    pub earnings_quarters: usize,

    /// Number of fiscal periods kept when building financial statements
    pub statement_periods: usize,
}

impl Default for FilingsConfig {
    fn default() -> Self {
        Self {
            sec_user_agent: DEFAULT_SEC_IDENTITY.to_string(),
            finnhub_api_key: None,
            request_timeout: Duration::from_secs(30),
            sec_requests_per_second: 10,
            earnings_quarters: 4,
            statement_periods: 3,
        }
    }
}

impl FilingsConfig {
    /// Create a new configuration builder
    pub fn builder() -> FilingsConfigBuilder {
        FilingsConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.sec_user_agent.trim().is_empty() {
            return Err(FilingsError::Config(
                "sec_user_agent must not be empty; SEC requires an identifying User-Agent"
                    .to_string(),
            ));
        }
        if self.sec_requests_per_second == 0 {
            return Err(FilingsError::Config(
                "sec_requests_per_second must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The Finnhub key, or a configuration error when it is missing
    pub fn require_finnhub_key(&self) -> Result<&str> {
        self.finnhub_api_key.as_deref().ok_or_else(|| {
            FilingsError::Config(
                "Finnhub API key required for market data operations".to_string(),
            )
        })
    }
}

/// Builder for FilingsConfig
#[derive(Debug, Default)]
pub struct FilingsConfigBuilder {
    sec_user_agent: Option<String>,
    finnhub_api_key: Option<String>,
    request_timeout: Option<Duration>,
    sec_requests_per_second: Option<u32>,
    earnings_quarters: Option<usize>,
    statement_periods: Option<usize>,
}

impl FilingsConfigBuilder {
    /// Set the SEC User-Agent identity
    pub fn sec_user_agent(mut self, identity: impl Into<String>) -> Self {
        self.sec_user_agent = Some(identity.into());
        self
    }

    /// Set the Finnhub API key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Set the upstream request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the SEC request budget per second
    pub fn sec_requests_per_second(mut self, budget: u32) -> Self {
        self.sec_requests_per_second = Some(budget);
        self
    }

    /// Set the number of EPS surprise quarters fetched per ticker
    pub fn earnings_quarters(mut self, quarters: usize) -> Self {
        self.earnings_quarters = Some(quarters);
        self
    }

    /// Set the number of fiscal periods kept per financial statement
    pub fn statement_periods(mut self, periods: usize) -> Self {
        self.statement_periods = Some(periods);
        self
    }

    /// Load the SEC identity and Finnhub key from the environment
    ///
    /// Reads `SEC_IDENTITY` and `FINNHUB_API_KEY`; unset variables leave
    /// the corresponding field untouched.
    pub fn with_env(mut self) -> Self {
        if let Ok(identity) = std::env::var("SEC_IDENTITY") {
            self.sec_user_agent = Some(identity);
        }
        if let Ok(key) = std::env::var("FINNHUB_API_KEY") {
            self.finnhub_api_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<FilingsConfig> {
        let defaults = FilingsConfig::default();

        let config = FilingsConfig {
            sec_user_agent: self.sec_user_agent.unwrap_or(defaults.sec_user_agent),
            finnhub_api_key: self.finnhub_api_key,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            sec_requests_per_second: self
                .sec_requests_per_second
                .unwrap_or(defaults.sec_requests_per_second),
            earnings_quarters: self.earnings_quarters.unwrap_or(defaults.earnings_quarters),
            statement_periods: self.statement_periods.unwrap_or(defaults.statement_periods),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FilingsConfig::default();
        assert_eq!(config.sec_requests_per_second, 10);
        assert_eq!(config.earnings_quarters, 4);
        assert_eq!(config.statement_periods, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = FilingsConfig::builder()
            .sec_user_agent("acme research (research@acme.com)")
            .finnhub_api_key("test_key")
            .request_timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.sec_user_agent, "acme research (research@acme.com)");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.require_finnhub_key().unwrap(), "test_key");
    }

    #[test]
    fn test_validation_rejects_empty_user_agent() {
        let config = FilingsConfig {
            sec_user_agent: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_finnhub_key_is_config_error() {
        let config = FilingsConfig::default();
        let err = config.require_finnhub_key().unwrap_err();
        assert!(matches!(err, FilingsError::Config(_)));
    }
}
