//! CSV-backed bulk provider and daily fallback source.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use minute_core::error::{DataError, DataResult};
use minute_core::traits::{BulkProvider, FallbackSource, HistoryOptions, ProviderBatch};
use minute_core::types::{encode_datetime, AdjustType, Bar, BarFields, Frequency, Instrument};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header names accepted for the timestamp column.
const DATETIME_COLUMNS: [&str; 4] = ["datetime", "date", "timestamp", "time"];

/// Load every bar from a CSV file, sorted by timestamp.
///
/// The timestamp column is found by name; every other column whose value
/// parses as a number becomes a bar field.
fn load_bars(path: &Path) -> DataResult<Vec<Bar>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| DataError::ParseError(format!("{}: {}", path.display(), e)))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::ParseError(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let datetime_idx = headers
        .iter()
        .position(|h| DATETIME_COLUMNS.contains(&h.as_str()))
        .ok_or_else(|| {
            DataError::ParseError(format!("{}: no datetime column", path.display()))
        })?;

    let mut bars = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| DataError::ParseError(e.to_string()))?;
        let raw = record.get(datetime_idx).unwrap_or_default();
        let datetime = parse_timestamp(raw)?;

        let fields: BarFields = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(idx, _)| *idx != datetime_idx)
            .filter_map(|(_, (name, value))| {
                value.trim().parse::<f64>().ok().map(|v| (name.clone(), v))
            })
            .collect();

        bars.push(Bar::from_encoded(encode_datetime(datetime), fields));
    }

    bars.sort_by_key(|b| b.datetime);
    Ok(bars)
}

/// Parse various timestamp formats.
fn parse_timestamp(value: &str) -> DataResult<NaiveDateTime> {
    let value = value.trim();
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y%m%d%H%M%S",
    ];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(value, format) {
            return Ok(d.and_time(Default::default()));
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse datetime: {}",
        value
    )))
}

/// Minute bars from one CSV file per provider symbol, `<dir>/<symbol>.csv`.
///
/// Each fetch re-reads the file, which keeps this provider as slow as the
/// cache in front of it assumes.
pub struct CsvBulkProvider {
    dir: PathBuf,
}

impl CsvBulkProvider {
    /// Create a provider over a directory of minute files.
    pub fn new(dir: impl Into<PathBuf>) -> DataResult<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Provider(format!(
                "minute data directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }
}

#[async_trait]
impl BulkProvider for CsvBulkProvider {
    async fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDateTime,
        end: NaiveDateTime,
        _adjust: AdjustType,
    ) -> DataResult<ProviderBatch> {
        let (lo, hi) = (encode_datetime(start), encode_datetime(end));
        let mut batch = ProviderBatch::new();
        let mut dates = BTreeSet::new();

        for symbol in symbols {
            let path = self.dir.join(format!("{}.csv", symbol));
            if !path.exists() {
                debug!(symbol = %symbol, path = %path.display(), "No minute file");
                batch = batch.with_bars(symbol.clone(), Vec::new());
                continue;
            }
            let bars: Vec<Bar> = load_bars(&path)?
                .into_iter()
                .filter(|bar| bar.datetime >= lo && bar.datetime <= hi)
                .collect();
            dates.extend(bars.iter().filter_map(Bar::date));
            batch = batch.with_bars(symbol.clone(), bars);
        }

        batch.trading_dates = dates.into_iter().collect();
        Ok(batch)
    }

    fn name(&self) -> &str {
        "csv-minute"
    }
}

/// Daily bars from one CSV file per instrument, `<dir>/<order_book_id>.csv`.
pub struct CsvDailySource {
    dir: PathBuf,
}

impl CsvDailySource {
    /// Create a daily source over a directory of daily files.
    pub fn new(dir: impl Into<PathBuf>) -> DataResult<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Provider(format!(
                "daily data directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    fn load(&self, instrument: &Instrument, frequency: Frequency) -> DataResult<Vec<Bar>> {
        if frequency != Frequency::Daily {
            return Err(DataError::UnsupportedFrequency(frequency));
        }
        let path = self.dir.join(format!("{}.csv", instrument.order_book_id));
        if !path.exists() {
            return Ok(Vec::new());
        }
        load_bars(&path)
    }
}

#[async_trait]
impl FallbackSource for CsvDailySource {
    async fn get_bar(
        &self,
        instrument: &Instrument,
        dt: NaiveDateTime,
        frequency: Frequency,
    ) -> DataResult<Option<Bar>> {
        let day = dt.date();
        Ok(self
            .load(instrument, frequency)?
            .into_iter()
            .find(|bar| bar.date() == Some(day)))
    }

    async fn history_bars(
        &self,
        instrument: &Instrument,
        bar_count: usize,
        frequency: Frequency,
        dt: NaiveDateTime,
        options: &HistoryOptions,
    ) -> DataResult<Vec<Bar>> {
        let day = dt.date();
        let bars: Vec<Bar> = self
            .load(instrument, frequency)?
            .into_iter()
            .filter(|bar| bar.date().is_some_and(|d| d <= day))
            // A suspended day trades nothing.
            .filter(|bar| !options.skip_suspended || bar.get("volume") != Some(0.0))
            .collect();

        let from = bars.len().saturating_sub(bar_count);
        Ok(bars[from..]
            .iter()
            .map(|bar| match &options.fields {
                Some(fields) => bar.project(fields),
                None => bar.clone(),
            })
            .collect())
    }

    fn name(&self) -> &str {
        "csv-daily"
    }
}
