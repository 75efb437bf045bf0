//! OKX market data provider.
//!
//! Candles come from two endpoints that both return at most [`PAGE_SIZE`]
//! rows, newest first:
//! - Recent: `{base}/api/v5/market/candles?instId=..&bar=..&limit=..`
//! - History: `{base}/api/v5/market/history-candles?instId=..&bar=..&limit=..&after=..`
//!
//! Instrument catalogs come from `{base}/api/v5/public/instruments?instType=..`
//! and are held in [`TtlCache`] snapshots for [`INSTRUMENT_TTL`].

mod bar;
mod models;
mod pagination;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use urlencoding::encode;

use crate::cache::{TtlCache, INSTRUMENT_TTL};
use crate::errors::MarketDataError;
use crate::models::{Instrument, InstrumentCandles, SwapInfo};
use crate::provider::JsonFetcher;

pub use bar::{normalize_bar, page_budget, DEFAULT_PAGE_BUDGET};
pub use models::{into_data, parse_num, OkxInstrument, RawCandle};
pub use pagination::{harvest_pages, stitch, Page, PageHarvest, PAGE_SIZE};

pub(crate) const PROVIDER_ID: &str = "OKX";
const DEFAULT_BASE_URL: &str = "https://www.okx.com";

/// Bar used when the caller does not specify one.
pub const DEFAULT_BAR: &str = "1H";

/// Maximum number of instruments a search returns.
pub const SEARCH_LIMIT: usize = 15;

const QUOTE_CCY: &str = "USDT";

const HEADERS: &[(&str, &str)] = &[("Accept", "application/json")];

/// Which candle endpoint a page reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CandleEndpoint {
    Recent,
    History,
}

impl CandleEndpoint {
    fn path(self) -> &'static str {
        match self {
            Self::Recent => "/api/v5/market/candles",
            Self::History => "/api/v5/market/history-candles",
        }
    }
}

/// OKX candle, spot catalog, and swap contract provider.
pub struct OkxProvider {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: String,
    spot_cache: TtlCache<Vec<Instrument>>,
    swap_cache: TtlCache<BTreeMap<String, SwapInfo>>,
}

impl OkxProvider {
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
            spot_cache: TtlCache::new("okx spot instruments", INSTRUMENT_TTL),
            swap_cache: TtlCache::new("okx swap contracts", INSTRUMENT_TTL),
        }
    }

    /// Point the provider at a different host (mirrors, proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    // ------------------------------------------------------------------------
    // Candles
    // ------------------------------------------------------------------------

    /// Fetch one page of the most recent candles, at most [`PAGE_SIZE`] rows.
    pub async fn get_candles(
        &self,
        inst_id: &str,
        bar: &str,
        limit: usize,
    ) -> Result<InstrumentCandles, MarketDataError> {
        let inst_id = validate_inst_id(inst_id)?;
        let bar = normalize_bar(bar);
        let limit = limit.clamp(1, PAGE_SIZE);

        let page = self
            .fetch_page(CandleEndpoint::Recent, inst_id, &bar, limit, None)
            .await?;

        finish(inst_id, page.rows)
    }

    /// Walk backwards through history up to the bar's page budget and stitch
    /// the pages into one ascending, duplicate-free series.
    pub async fn get_candle_history(
        &self,
        inst_id: &str,
        bar: &str,
    ) -> Result<InstrumentCandles, MarketDataError> {
        let inst_id = validate_inst_id(inst_id)?;
        let harvest = self.collect_history(inst_id, bar).await?;
        finish(inst_id, harvest.rows)
    }

    /// Raw page harvest for `inst_id`, before stitching.
    pub async fn collect_history(
        &self,
        inst_id: &str,
        bar: &str,
    ) -> Result<PageHarvest, MarketDataError> {
        let bar = normalize_bar(bar);
        let budget = page_budget(&bar);
        debug!("Collecting {} {} history over up to {} pages", inst_id, bar, budget);

        let harvest = harvest_pages(budget, |after| {
            let endpoint = if after.is_none() {
                CandleEndpoint::Recent
            } else {
                CandleEndpoint::History
            };
            self.fetch_page(endpoint, inst_id, &bar, PAGE_SIZE, after)
        })
        .await?;

        debug!(
            "Collected {} rows for {} {} in {} pages",
            harvest.rows.len(),
            inst_id,
            bar,
            harvest.pages_fetched
        );
        Ok(harvest)
    }

    async fn fetch_page(
        &self,
        endpoint: CandleEndpoint,
        inst_id: &str,
        bar: &str,
        limit: usize,
        after: Option<i64>,
    ) -> Result<Page, MarketDataError> {
        let mut url = format!(
            "{}{}?instId={}&bar={}&limit={}",
            self.base_url,
            endpoint.path(),
            encode(inst_id),
            encode(bar),
            limit
        );
        if let Some(after) = after {
            url.push_str(&format!("&after={}", after));
        }

        let payload = self.fetcher.fetch_json(&url, HEADERS).await?;
        let rows: Vec<Vec<Value>> = into_data(inst_id, payload)?;

        Ok(Page {
            returned: rows.len(),
            rows: rows.iter().filter_map(|row| RawCandle::from_row(row)).collect(),
        })
    }

    // ------------------------------------------------------------------------
    // Instruments
    // ------------------------------------------------------------------------

    /// Live USDT spot pairs whose symbol or base asset contains `query`,
    /// case-insensitively, capped at [`SEARCH_LIMIT`].
    ///
    /// A blank query returns nothing and leaves the cache alone.
    pub async fn search_instruments(&self, query: &str) -> Vec<Instrument> {
        let needle = query.trim().to_uppercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let instruments = self
            .spot_cache
            .get_or_refresh(|| self.load_spot_instruments())
            .await;

        instruments
            .iter()
            .filter(|instrument| instrument.matches_upper(&needle))
            .take(SEARCH_LIMIT)
            .cloned()
            .collect()
    }

    /// Contract specs of every live USDT-margined swap, keyed by base asset.
    pub async fn swap_info_map(&self) -> Arc<BTreeMap<String, SwapInfo>> {
        self.swap_cache
            .get_or_refresh(|| self.load_swap_contracts())
            .await
    }

    /// Contract spec for one base asset (e.g. "BTC"), matched case-insensitively.
    pub async fn swap_info(&self, base: &str) -> Result<SwapInfo, MarketDataError> {
        let key = base.trim().to_uppercase();
        self.swap_info_map()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| MarketDataError::SymbolNotFound(base.trim().to_string()))
    }

    async fn fetch_catalog(&self, inst_type: &str) -> Result<Vec<OkxInstrument>, MarketDataError> {
        let url = format!(
            "{}/api/v5/public/instruments?instType={}",
            self.base_url, inst_type
        );
        let payload = self.fetcher.fetch_json(&url, HEADERS).await?;
        into_data(inst_type, payload)
    }

    async fn load_spot_instruments(&self) -> Result<Vec<Instrument>, MarketDataError> {
        let catalog = self.fetch_catalog("SPOT").await?;
        Ok(catalog
            .into_iter()
            .filter(|i| i.is_live() && i.quote_ccy == QUOTE_CCY)
            .map(|i| Instrument {
                name: format!("{}/{}", i.base_ccy, QUOTE_CCY),
                symbol: i.inst_id,
                base: i.base_ccy,
            })
            .collect())
    }

    async fn load_swap_contracts(&self) -> Result<BTreeMap<String, SwapInfo>, MarketDataError> {
        let catalog = self.fetch_catalog("SWAP").await?;
        Ok(catalog
            .into_iter()
            .filter(|i| i.is_live() && i.settle_ccy == QUOTE_CCY && !i.ct_val_ccy.is_empty())
            .map(|i| {
                let info = SwapInfo {
                    max_lever: parse_num(&i.lever),
                    ct_val: parse_num(&i.ct_val),
                    ct_mult: parse_num(&i.ct_mult),
                    min_sz: parse_num(&i.min_sz),
                    lot_sz: parse_num(&i.lot_sz),
                    tick_sz: parse_num(&i.tick_sz),
                    inst_id: i.inst_id,
                    ct_val_ccy: i.ct_val_ccy.clone(),
                };
                (i.ct_val_ccy, info)
            })
            .collect())
    }
}

fn validate_inst_id(inst_id: &str) -> Result<&str, MarketDataError> {
    let inst_id = inst_id.trim();
    if inst_id.is_empty() {
        return Err(MarketDataError::InvalidRequest(
            "instId must not be empty".to_string(),
        ));
    }
    Ok(inst_id)
}

fn finish(inst_id: &str, rows: Vec<RawCandle>) -> Result<InstrumentCandles, MarketDataError> {
    if rows.is_empty() {
        return Err(MarketDataError::NoData(inst_id.to_string()));
    }
    Ok(InstrumentCandles {
        inst_id: inst_id.to_string(),
        candles: stitch(rows),
    })
}

// ============================================================================
// Tests
// ============================================================================
