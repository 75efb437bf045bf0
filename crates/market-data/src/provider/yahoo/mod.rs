//! Yahoo Finance market data provider.
//!
//! Serves the chart endpoint (OHLCV as parallel arrays, single request per
//! range) and ticker search:
//! - Chart: `{base}/v8/finance/chart/{symbol}?range={range}&interval={interval}`
//! - Search: `{base}/v1/finance/search?q={query}&quotesCount=10&newsCount=0`

mod models;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{Candle, ChartSeries, SearchResult};
use crate::provider::JsonFetcher;

pub use models::{YahooChartResponse, YahooChartResult, YahooSearchResponse};

const PROVIDER_ID: &str = "YAHOO";
const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Range requested when the caller does not specify one.
pub const DEFAULT_RANGE: &str = "1y";

/// Interval requested when the caller does not specify one.
pub const DEFAULT_INTERVAL: &str = "1d";

const SEARCH_QUOTES_COUNT: u32 = 10;

/// Yahoo rejects requests without a browser-like user agent.
const HEADERS: &[(&str, &str)] = &[(
    "User-Agent",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
)];

/// Yahoo Finance chart and search provider.
pub struct YahooProvider {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
}

impl YahooProvider {
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different host (mirrors, proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch OHLCV history for `symbol`.
    ///
    /// Bars with a zero or missing open/high/low/close are dropped. A
    /// response without a result is [`MarketDataError::SymbolNotFound`].
    pub async fn get_chart(
        &self,
        symbol: &str,
        range: Option<&str>,
        interval: Option<&str>,
    ) -> Result<ChartSeries, MarketDataError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(MarketDataError::InvalidRequest(
                "symbol must not be empty".to_string(),
            ));
        }

        let range = range.filter(|r| !r.is_empty()).unwrap_or(DEFAULT_RANGE);
        let interval = interval.filter(|i| !i.is_empty()).unwrap_or(DEFAULT_INTERVAL);
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}",
            self.base_url,
            encode(symbol),
            encode(range),
            encode(interval)
        );

        debug!("Fetching {} chart for {} ({} / {})", PROVIDER_ID, symbol, range, interval);

        let payload = self.fetcher.fetch_json(&url, HEADERS).await?;
        let response: YahooChartResponse = serde_json::from_value(payload)
            .map_err(|e| MarketDataError::parse(format!("Failed to parse chart response: {}", e)))?;

        let result = response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Ok(normalize_chart(symbol, result))
    }

    /// Search tickers matching `query`.
    ///
    /// Blank queries return nothing without calling upstream. Upstream
    /// failures degrade to an empty list.
    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.try_search(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!("{} search for '{}' failed: {}", PROVIDER_ID, query, e);
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let url = format!(
            "{}/v1/finance/search?q={}&quotesCount={}&newsCount=0",
            self.base_url,
            encode(query),
            SEARCH_QUOTES_COUNT
        );

        let payload: Value = self.fetcher.fetch_json(&url, HEADERS).await?;
        let response: YahooSearchResponse = serde_json::from_value(payload)
            .map_err(|e| MarketDataError::parse(format!("Failed to parse search response: {}", e)))?;

        Ok(response
            .quotes
            .into_iter()
            .filter_map(|quote| {
                let symbol = quote.symbol?;
                let name = quote
                    .long_name
                    .or(quote.short_name)
                    .unwrap_or_else(|| symbol.clone());
                let exchange = quote.exch_disp.or(quote.exchange).unwrap_or_default();
                Some(SearchResult::new(
                    symbol,
                    name,
                    quote.quote_type.unwrap_or_default(),
                    exchange,
                ))
            })
            .collect())
    }
}

/// Build a [`ChartSeries`] from one chart result.
///
/// Total over ragged input: a missing array element becomes 0 and the bar is
/// then filtered out as unpriced.
pub fn normalize_chart(symbol: &str, result: YahooChartResult) -> ChartSeries {
    let meta = result.meta;
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten().unwrap_or(0.0);

    let candles = result
        .timestamp
        .iter()
        .enumerate()
        .map(|(i, &time)| Candle {
            time,
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close: at(&quote.close, i),
            volume: at(&quote.volume, i),
        })
        .filter(Candle::is_priced)
        .collect();

    ChartSeries {
        symbol: meta.symbol.unwrap_or_else(|| symbol.to_string()),
        currency: meta.currency.unwrap_or_default(),
        exchange: meta.exchange_name.unwrap_or_default(),
        name: meta
            .long_name
            .or(meta.short_name)
            .unwrap_or_else(|| symbol.to_string()),
        candles,
    }
}

// ============================================================================
// Tests
// ============================================================================
