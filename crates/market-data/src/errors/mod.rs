//! Error types for the market data crate.
//!
//! [`MarketDataError`] covers everything that can go wrong between the
//! outbound HTTP request and the normalized candle series. The HTTP layer
//! only needs to know whether an error is a "not found" condition or a
//! server-side failure, which [`MarketDataError::is_not_found`] answers.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol or instrument does not exist upstream.
    #[error("No result for symbol: {0}")]
    SymbolNotFound(String),

    /// Every page came back empty, so there is nothing to stitch.
    #[error("No candle data for {0}")]
    NoData(String),

    /// The upstream answered, but the body was not valid structured data
    /// (or did not match the expected shape).
    #[error("Upstream parse error: {message}")]
    UpstreamParse {
        /// Description of the parse failure
        message: String,
    },

    /// The connection to the upstream failed before a body was received.
    #[error("Upstream transport error: {message}")]
    UpstreamTransport {
        /// Description of the transport failure
        message: String,
    },

    /// The upstream answered with an API-level error code.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The caller supplied a request that cannot be sent upstream.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl MarketDataError {
    /// Whether the error means "the requested thing is absent".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_) | Self::NoData(_))
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Self::UpstreamParse {
            message: message.into(),
        }
    }

    pub(crate) fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::UpstreamParse {
                message: err.to_string(),
            }
        } else {
            Self::UpstreamTransport {
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(MarketDataError::SymbolNotFound("AAPL".to_string()).is_not_found());
        assert!(MarketDataError::NoData("BTC-USDT".to_string()).is_not_found());
        assert!(!MarketDataError::parse("bad json").is_not_found());
        assert!(!MarketDataError::UpstreamTransport {
            message: "connection reset".to_string()
        }
        .is_not_found());
        assert!(!MarketDataError::provider("OKX", "rate limited").is_not_found());
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "No result for symbol: INVALID");

        let error = MarketDataError::provider("OKX", "Instrument ID does not exist");
        assert_eq!(
            format!("{}", error),
            "Provider error: OKX - Instrument ID does not exist"
        );

        let error = MarketDataError::parse("expected value at line 1 column 1");
        assert_eq!(
            format!("{}", error),
            "Upstream parse error: expected value at line 1 column 1"
        );
    }
}
