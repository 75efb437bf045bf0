//! Martingale Market Data Crate
//!
//! Fetches OHLCV candles and instrument reference data from two upstream
//! providers and normalizes them into one schema.
//!
//! # Overview
//!
//! - Yahoo Finance: single-shot charts (parallel arrays) and ticker search
//! - OKX: cursor-paged candles stitched into one series, spot instrument
//!   search, and perpetual swap contract specs
//! - TTL snapshots for instrument catalogs
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  YahooProvider   |     |   OkxProvider    |
//! +------------------+     +------------------+
//!          |                   |            |
//!          |                   v            v
//!          |          +--------------+  +----------+
//!          |          | harvest_pages|  | TtlCache |  (instrument catalogs)
//!          |          |   + stitch   |  +----------+
//!          |          +--------------+       |
//!          v                   v             v
//!        +--------------------------------------+
//!        |             JsonFetcher              |  (one request -> JSON)
//!        +--------------------------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Candle`] - Canonical OHLCV bar (unix seconds)
//! - [`ChartSeries`] - Yahoo chart with metadata
//! - [`InstrumentCandles`] - OKX candles for one instrument
//! - [`Instrument`] / [`SwapInfo`] - OKX reference data
//! - [`MarketDataError`] - Error taxonomy shared by all providers

pub mod cache;
pub mod errors;
pub mod models;
pub mod provider;

pub use cache::{TtlCache, INSTRUMENT_TTL};
pub use errors::MarketDataError;
pub use models::{Candle, ChartSeries, Instrument, InstrumentCandles, SearchResult, SwapInfo};
pub use provider::okx::OkxProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{HttpFetcher, JsonFetcher};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::scripted::ScriptedFetcher;
