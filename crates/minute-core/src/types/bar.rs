//! Minute bar type.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::datetime::{decode_datetime, encode_datetime};

/// Field name to value mapping carried by a bar.
///
/// The field set is whatever the provider returns (open, high, low, close,
/// volume, total_turnover, ...). The cache never interprets it.
pub type BarFields = BTreeMap<String, f64>;

/// One timestamped observation for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Timestamp encoded as `YYYYMMDDHHMMSS`
    pub datetime: i64,
    /// Provider-defined numeric fields
    #[serde(flatten)]
    pub fields: BarFields,
}

impl Bar {
    /// Create an empty bar at the given datetime.
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self {
            datetime: encode_datetime(datetime),
            fields: BarFields::new(),
        }
    }

    /// Create a bar from an already encoded timestamp.
    pub fn from_encoded(datetime: i64, fields: BarFields) -> Self {
        Self { datetime, fields }
    }

    /// Create an OHLCV bar.
    pub fn ohlcv(
        datetime: NaiveDateTime,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self::new(datetime)
            .with_field("open", open)
            .with_field("high", high)
            .with_field("low", low)
            .with_field("close", close)
            .with_field("volume", volume)
    }

    /// Set a field value.
    pub fn with_field(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Get a field value.
    #[inline]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    /// Closing price, if the provider supplied one.
    #[inline]
    pub fn close(&self) -> Option<f64> {
        self.get("close")
    }

    /// Decoded timestamp.
    pub fn naive_datetime(&self) -> Option<NaiveDateTime> {
        decode_datetime(self.datetime)
    }

    /// Calendar date of the bar.
    pub fn date(&self) -> Option<NaiveDate> {
        self.naive_datetime().map(|dt| dt.date())
    }

    /// Keep only the named fields. Unknown names are ignored.
    pub fn project(&self, names: &[String]) -> Self {
        let fields = self
            .fields
            .iter()
            .filter(|(k, _)| names.iter().any(|n| n == *k))
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        Self {
            datetime: self.datetime,
            fields,
        }
    }
}
