//! Market data models
//!
//! - `candle` - Canonical OHLCV bar and the per-provider series wrappers
//! - `instrument` - Spot instrument and swap contract reference data
//! - `search` - Search result data (SearchResult)

mod candle;
mod instrument;
mod search;

pub use candle::{Candle, ChartSeries, InstrumentCandles};
pub use instrument::{Instrument, SwapInfo};
pub use search::SearchResult;
