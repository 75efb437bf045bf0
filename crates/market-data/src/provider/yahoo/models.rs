//! Yahoo Finance API response models.
//!
//! The chart endpoint returns OHLCV data as parallel arrays under
//! `indicators.quote[0]`, index-aligned with `timestamp`. Any element may be
//! `null` when Yahoo has no print for that bucket.

use serde::{Deserialize, Deserializer};

/// Yahoo sends `null` instead of an empty array for buckets with no data.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Main response wrapper for the v8 chart API
#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    pub chart: YahooChart,
}

#[derive(Debug, Deserialize)]
pub struct YahooChart {
    #[serde(default)]
    pub result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    pub error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Individual result from the chart API
#[derive(Debug, Default, Deserialize)]
pub struct YahooChartResult {
    #[serde(default)]
    pub meta: YahooChartMeta,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: Vec<i64>,
    #[serde(default)]
    pub indicators: YahooIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooChartMeta {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub exchange_name: Option<String>,
    pub long_name: Option<String>,
    pub short_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct YahooIndicators {
    #[serde(default, deserialize_with = "null_as_default")]
    pub quote: Vec<YahooQuoteArrays>,
}

/// Parallel OHLCV arrays
#[derive(Debug, Default, Deserialize)]
pub struct YahooQuoteArrays {
    #[serde(default, deserialize_with = "null_as_default")]
    pub open: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub high: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub low: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub close: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume: Vec<Option<f64>>,
}

/// Response from the v1 search API
#[derive(Debug, Deserialize)]
pub struct YahooSearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub quotes: Vec<YahooSearchQuote>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSearchQuote {
    pub symbol: Option<String>,
    #[serde(rename = "shortname")]
    pub short_name: Option<String>,
    #[serde(rename = "longname")]
    pub long_name: Option<String>,
    pub quote_type: Option<String>,
    pub exchange: Option<String>,
    pub exch_disp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_chart_with_nulls() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"currency": "USD", "symbol": "AAPL", "exchangeName": "NMS"},
                    "timestamp": [1700000000, 1700086400],
                    "indicators": {"quote": [{
                        "open": [189.5, null],
                        "high": [190.1, null],
                        "low": [188.0, null],
                        "close": [189.9, null],
                        "volume": [51000000, null]
                    }]}
                }],
                "error": null
            }
        }"#;
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        let result = &response.chart.result.as_ref().unwrap()[0];
        assert_eq!(result.meta.exchange_name.as_deref(), Some("NMS"));
        assert_eq!(result.timestamp.len(), 2);
        assert_eq!(result.indicators.quote[0].open, vec![Some(189.5), None]);
        assert_eq!(result.indicators.quote[0].volume[0], Some(51000000.0));
    }

    #[test]
    fn test_deserialize_chart_null_arrays() {
        let json = r#"{
            "chart": {
                "result": [{
                    "meta": {"symbol": "XYZ"},
                    "timestamp": null,
                    "indicators": {"quote": [{"open": null, "close": null}]}
                }],
                "error": null
            }
        }"#;
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        let result = &response.chart.result.as_ref().unwrap()[0];
        assert!(result.timestamp.is_empty());
        assert!(result.indicators.quote[0].open.is_empty());
    }

    #[test]
    fn test_deserialize_chart_not_found() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        }"#;
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        assert!(response.chart.result.is_none());
        assert_eq!(
            response.chart.error.and_then(|e| e.code).as_deref(),
            Some("Not Found")
        );
    }

    #[test]
    fn test_deserialize_search_quote() {
        let json = r#"{"quotes": [{
            "symbol": "SHOP.TO",
            "shortname": "SHOPIFY INC",
            "longname": "Shopify Inc.",
            "quoteType": "EQUITY",
            "exchange": "TOR",
            "exchDisp": "Toronto"
        }]}"#;
        let response: YahooSearchResponse = serde_json::from_str(json).unwrap();
        let quote = &response.quotes[0];
        assert_eq!(quote.long_name.as_deref(), Some("Shopify Inc."));
        assert_eq!(quote.quote_type.as_deref(), Some("EQUITY"));
        assert_eq!(quote.exch_disp.as_deref(), Some("Toronto"));
    }
}
