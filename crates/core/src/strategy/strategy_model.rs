//! Strategy store domain models.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::errors::{Result, ValidationError};

/// Field holding the caller-supplied version label.
pub const VERSION_FIELD: &str = "_version";

/// Field the store sets to the UTC calendar date of each write.
pub const LAST_UPDATE_FIELD: &str = "_lastUpdate";

/// Version shown for backups without a usable `_version`.
pub const UNKNOWN_VERSION: &str = "?";

/// Caller-defined strategy configuration.
///
/// The contents are opaque apart from `_version` and `_lastUpdate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyDocument(Map<String, Value>);

impl StrategyDocument {
    /// Accept any JSON object; everything else is a validation error.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ValidationError::NotAnObject.into()),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set `_lastUpdate` to `date` as `YYYY-MM-DD`.
    pub fn stamp_last_update(&mut self, date: NaiveDate) {
        self.0.insert(
            LAST_UPDATE_FIELD.to_string(),
            Value::String(date.format("%Y-%m-%d").to_string()),
        );
    }

    /// `_version` for display: strings as-is, other values as JSON text,
    /// and `"?"` when absent, null, or empty.
    pub fn version_label(&self) -> String {
        match self.0.get(VERSION_FIELD) {
            None | Some(Value::Null) => UNKNOWN_VERSION.to_string(),
            Some(Value::String(s)) if s.is_empty() => UNKNOWN_VERSION.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// One backup snapshot as listed by the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub filename: String,
    /// File modification time, RFC 3339 with millisecond precision.
    #[serde(serialize_with = "serialize_millis")]
    pub date: DateTime<Utc>,
    pub version: String,
}

fn serialize_millis<S: Serializer>(
    date: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> StrategyDocument {
        StrategyDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_requires_object() {
        assert!(StrategyDocument::from_value(json!({"a": 1})).is_ok());
        for value in [json!([1, 2]), json!("text"), json!(3), Value::Null] {
            assert!(StrategyDocument::from_value(value).is_err());
        }
    }

    #[test]
    fn test_version_label() {
        assert_eq!(doc(json!({"_version": "v2.1"})).version_label(), "v2.1");
        assert_eq!(doc(json!({"_version": 3})).version_label(), "3");
        assert_eq!(doc(json!({"_version": {"major": 1}})).version_label(), r#"{"major":1}"#);
        assert_eq!(doc(json!({"_version": ""})).version_label(), "?");
        assert_eq!(doc(json!({"_version": null})).version_label(), "?");
        assert_eq!(doc(json!({"other": 1})).version_label(), "?");
    }

    #[test]
    fn test_stamp_last_update_overwrites() {
        let mut document = doc(json!({"_lastUpdate": "1999-01-01", "risk": 0.5}));
        document.stamp_last_update(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(
            document.into_value(),
            json!({"_lastUpdate": "2024-03-09", "risk": 0.5})
        );
    }

    #[test]
    fn test_history_entry_serializes_rfc3339_date() {
        let entry = HistoryEntry {
            filename: "strategy-2024-03-09T10-00-00-000000Z.json".to_string(),
            date: DateTime::parse_from_rfc3339("2024-03-09T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            version: "v1".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-03-09T10:00:00.000Z");
        assert_eq!(json["version"], "v1");
    }

    #[test]
    fn test_history_entry_date_truncates_to_millis() {
        let entry = HistoryEntry {
            filename: "strategy-2024-03-09T10-00-00-123456Z.json".to_string(),
            date: DateTime::parse_from_rfc3339("2024-03-09T10:00:00.123456789Z")
                .unwrap()
                .with_timezone(&Utc),
            version: "?".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-03-09T10:00:00.123Z");

        let parsed: HistoryEntry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.date.timestamp_millis(), entry.date.timestamp_millis());
    }
}
