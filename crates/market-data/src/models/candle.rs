use serde::{Deserialize, Serialize};

/// One time-bucketed OHLCV bar.
///
/// `time` is unix seconds. Prices of zero (or missing, which the normalizers
/// default to zero) mark a bar as missing data rather than a real price.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// True when every price field holds a positive value.
    ///
    /// NaN compares false, so it is treated like a missing price.
    pub fn is_priced(&self) -> bool {
        self.open > 0.0 && self.high > 0.0 && self.low > 0.0 && self.close > 0.0
    }
}

/// Provider A (chart) response after normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub symbol: String,
    pub currency: String,
    pub exchange: String,
    pub name: String,
    pub candles: Vec<Candle>,
}

/// Provider B (exchange) response after normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentCandles {
    pub inst_id: String,
    pub candles: Vec<Candle>,
}
