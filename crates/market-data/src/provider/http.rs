//! reqwest-backed [`JsonFetcher`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::provider::JsonFetcher;

/// Fetches JSON over HTTP with a shared connection pool.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Use an existing client (shared pool, custom TLS, proxy, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(
        &self,
        url: &str,
        headers: &[(&'static str, &'static str)],
    ) -> Result<Value, MarketDataError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| {
            MarketDataError::parse(format!("{} returned {} with unparsable body: {}", url, status, e))
        })
    }
}
