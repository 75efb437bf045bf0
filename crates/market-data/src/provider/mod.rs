//! Market data provider adapters.
//!
//! This module contains:
//! - The [`JsonFetcher`] trait: one outbound request, parsed JSON back
//! - [`HttpFetcher`], the reqwest implementation used in production
//! - The Yahoo Finance chart/search provider
//! - The OKX candle, instrument catalog, and swap contract provider
//!
//! Providers own URL construction and payload interpretation; the fetcher
//! owns transport and JSON parsing. Swapping the fetcher is how tests replay
//! canned upstream responses.

mod http;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod scripted;

pub mod okx;
pub mod yahoo;

pub use http::HttpFetcher;
pub use traits::JsonFetcher;
