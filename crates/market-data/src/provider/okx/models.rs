//! OKX v5 REST response models.
//!
//! Every endpoint wraps its payload in `{ "code": "0", "msg": "", "data": [...] }`.
//! Candle rows are positional string arrays, newest first:
//! `[ts, open, high, low, close, vol, volCcy, volCcyQuote, confirm]`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::Candle;

use super::PROVIDER_ID;

/// OKX code for an unknown `instId`.
const INSTRUMENT_NOT_FOUND: &str = "51001";

#[derive(Debug, Deserialize)]
pub struct OkxEnvelope<T> {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Unwrap the envelope, turning a non-zero `code` into an error.
pub fn into_data<T: DeserializeOwned>(subject: &str, payload: Value) -> Result<Vec<T>, MarketDataError> {
    let envelope: OkxEnvelope<T> = serde_json::from_value(payload).map_err(|e| {
        MarketDataError::parse(format!("Failed to parse {} response: {}", PROVIDER_ID, e))
    })?;

    match envelope.code.as_str() {
        "0" => Ok(envelope.data),
        INSTRUMENT_NOT_FOUND => Err(MarketDataError::SymbolNotFound(subject.to_string())),
        code => Err(MarketDataError::provider(
            PROVIDER_ID,
            format!("code {}: {}", code, envelope.msg),
        )),
    }
}

/// One candle row before normalization; `ts` is in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawCandle {
    pub ts: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawCandle {
    /// Parse a positional row. Rows without a usable timestamp are rejected;
    /// short rows or unparsable prices default to 0 and are filtered later.
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let ts = row.first().and_then(as_i64)?;
        let field = |i: usize| row.get(i).and_then(as_f64).unwrap_or(0.0);
        Some(Self {
            ts,
            open: field(1),
            high: field(2),
            low: field(3),
            close: field(4),
            volume: field(5),
        })
    }

    pub fn into_candle(self) -> Candle {
        Candle {
            time: self.ts / 1000,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

/// Entry of `/api/v5/public/instruments`. OKX sends `""` for fields that do
/// not apply to the instrument type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxInstrument {
    pub inst_id: String,
    pub base_ccy: String,
    pub quote_ccy: String,
    pub settle_ccy: String,
    pub ct_val: String,
    pub ct_mult: String,
    pub ct_val_ccy: String,
    pub lever: String,
    pub min_sz: String,
    pub lot_sz: String,
    pub tick_sz: String,
    pub state: String,
}

impl OkxInstrument {
    pub fn is_live(&self) -> bool {
        self.state == "live"
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// Parse a numeric string field, defaulting to 0.
pub fn parse_num(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_row_parses_strings() {
        let row = json!(["1700000000000", "37000.1", "37100", "36900.5", "37050", "12.5", "0", "0", "1"]);
        let raw = RawCandle::from_row(row.as_array().unwrap()).unwrap();
        assert_eq!(raw.ts, 1_700_000_000_000);
        assert_eq!(raw.open, 37000.1);
        assert_eq!(raw.volume, 12.5);
        assert_eq!(raw.into_candle().time, 1_700_000_000);
    }

    #[test]
    fn test_from_row_short_row_defaults_to_zero() {
        let row = json!(["1700000000000", "1.5"]);
        let raw = RawCandle::from_row(row.as_array().unwrap()).unwrap();
        assert_eq!(raw.open, 1.5);
        assert_eq!(raw.close, 0.0);
        assert!(!raw.into_candle().is_priced());
    }

    #[test]
    fn test_from_row_rejects_bad_timestamp() {
        let row = json!(["not-a-ts", "1", "1", "1", "1", "1"]);
        assert!(RawCandle::from_row(row.as_array().unwrap()).is_none());
        assert!(RawCandle::from_row(&[]).is_none());
    }

    #[test]
    fn test_into_data_ok() {
        let payload = json!({"code": "0", "msg": "", "data": [["1", "2"]]});
        let data: Vec<Vec<Value>> = into_data("BTC-USDT", payload).unwrap();
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_into_data_unknown_instrument() {
        let payload = json!({"code": "51001", "msg": "Instrument ID does not exist", "data": []});
        let err = into_data::<Vec<Value>>("FOO-USDT", payload).unwrap_err();
        assert!(matches!(err, MarketDataError::SymbolNotFound(ref s) if s == "FOO-USDT"));
    }

    #[test]
    fn test_into_data_other_code_is_provider_error() {
        let payload = json!({"code": "50011", "msg": "Too Many Requests", "data": []});
        let err = into_data::<Vec<Value>>("BTC-USDT", payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Provider error: OKX - code 50011: Too Many Requests"
        );
    }

    #[test]
    fn test_into_data_wrong_shape_is_parse_error() {
        let err = into_data::<Vec<Value>>("BTC-USDT", json!(["not", "an", "envelope"])).unwrap_err();
        assert!(matches!(err, MarketDataError::UpstreamParse { .. }));
    }

    #[test]
    fn test_instrument_empty_fields_default() {
        let json = json!({"instId": "BTC-USDT", "baseCcy": "BTC", "quoteCcy": "USDT", "state": "live"});
        let instrument: OkxInstrument = serde_json::from_value(json).unwrap();
        assert!(instrument.is_live());
        assert_eq!(instrument.settle_ccy, "");
        assert_eq!(parse_num(&instrument.ct_val), 0.0);
    }
}
