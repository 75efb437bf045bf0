//! Provider adapter trait definitions.
//!
//! A [`JsonFetcher`] performs exactly one outbound request and hands back the
//! parsed body. It knows nothing about candles or instruments; providers
//! build URLs, call the fetcher, and map the payload into domain models.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::MarketDataError;

/// One outbound fetch returning structured data.
///
/// Implementations must not retry and must not impose their own timeout;
/// the caller decides how long a request may take.
///
/// # Errors
///
/// - [`MarketDataError::UpstreamTransport`] when the connection fails
/// - [`MarketDataError::UpstreamParse`] when the body is not valid JSON
///
/// A non-2xx status with a JSON body is *not* an error at this layer: the
/// body is returned so providers can interpret upstream error payloads.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(
        &self,
        url: &str,
        headers: &[(&'static str, &'static str)],
    ) -> Result<Value, MarketDataError>;
}
