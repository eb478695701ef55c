//! CLI command implementations.

pub mod bar;
pub mod calendar;
pub mod history;
pub mod range;
pub mod validate;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use minute_config::AppConfig;
use minute_core::{
    Bar, DataError, DataResult, FallbackSource, Frequency, HistoryOptions, Instrument,
};
use minute_data::{
    CalendarAdapter, CsvBulkProvider, CsvDailySource, FillEngine, MinuteDataSource,
    SymbolTranslator, TradingCalendar,
};
use std::sync::Arc;
use tracing::info;

use crate::cli::InstrumentArgs;

/// Fallback used when no daily directory is configured.
struct NoDailyData;

#[async_trait]
impl FallbackSource for NoDailyData {
    async fn get_bar(
        &self,
        _instrument: &Instrument,
        _dt: NaiveDateTime,
        _frequency: Frequency,
    ) -> DataResult<Option<Bar>> {
        Err(DataError::Provider("no daily data directory configured".to_string()))
    }

    async fn history_bars(
        &self,
        _instrument: &Instrument,
        _bar_count: usize,
        _frequency: Frequency,
        _dt: NaiveDateTime,
        _options: &HistoryOptions,
    ) -> DataResult<Vec<Bar>> {
        Err(DataError::Provider("no daily data directory configured".to_string()))
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Build the data source described by the configuration.
pub fn build_source(config: &AppConfig) -> Result<MinuteDataSource> {
    let calendar = TradingCalendar::from_csv(&config.data.calendar_file)
        .with_context(|| format!("Failed to load calendar {:?}", config.data.calendar_file))?;
    let provider = CsvBulkProvider::new(&config.data.minute_dir)?;
    let fallback: Arc<dyn FallbackSource> = match &config.data.daily_dir {
        Some(dir) => Arc::new(CsvDailySource::new(dir)?),
        None => Arc::new(NoDailyData),
    };
    info!(
        trading_dates = calendar.len(),
        minute_dir = %config.data.minute_dir.display(),
        fallback = fallback.name(),
        "Data source ready"
    );

    let engine = FillEngine::new(
        Arc::new(provider),
        CalendarAdapter::new(Arc::new(calendar)),
        SymbolTranslator::new(config.symbols.pairs()),
    )
    .with_session(config.cache.session())
    .with_adjust_type(config.cache.adjust_type);

    Ok(MinuteDataSource::new(engine, fallback)
        .with_cache_size(config.cache.initial_size)
        .with_data_start(config.cache.data_start))
}

/// Resolve the instrument, defaulting the listing date to the first
/// calendar date.
pub fn resolve_instrument(source: &MinuteDataSource, args: &InstrumentArgs) -> Result<Instrument> {
    let listed_date = match args.listed_date {
        Some(date) => date,
        None => source
            .trading_calendar()?
            .first()
            .copied()
            .context("Trading calendar is empty")?,
    };
    Ok(Instrument::new(args.symbol.clone(), listed_date))
}

/// Parse a CLI datetime.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid datetime: {}", value))?;
    Ok(date.and_time(Default::default()))
}

/// One line of text output for a bar.
pub fn format_bar(bar: &Bar) -> String {
    let when = bar
        .naive_datetime()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| bar.datetime.to_string());
    let fields: Vec<String> = bar
        .fields
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    format!("{}  {}", when, fields.join(" "))
}
