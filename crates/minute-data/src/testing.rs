//! Fixtures shared by the unit tests.

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use minute_core::error::DataResult;
use minute_core::traits::{BulkProvider, FallbackSource, HistoryOptions, ProviderBatch};
use minute_core::types::{encode_datetime, AdjustType, Bar, Frequency, Instrument};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::calendar::TradingCalendar;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).unwrap()
}

/// `count` consecutive minute bars starting at 09:31; close is the minute index.
pub fn session_bars(day: NaiveDate, count: usize) -> Vec<Bar> {
    let open = at(day, 9, 31);
    (0..count)
        .map(|i| {
            let price = 10.0 + i as f64;
            Bar::ohlcv(
                open + Duration::minutes(i as i64),
                price,
                price + 0.5,
                price - 0.5,
                price,
                1000.0,
            )
        })
        .collect()
}

/// Calendar of every Monday to Friday in `[from, to]`.
pub fn weekday_calendar(from: NaiveDate, to: NaiveDate) -> TradingCalendar {
    let dates = from
        .iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .collect();
    TradingCalendar::new(dates)
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchCall {
    pub symbols: Vec<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub adjust: AdjustType,
}

/// In-memory provider that records every fetch.
#[derive(Default)]
pub struct MockProvider {
    bars: HashMap<String, Vec<Bar>>,
    calls: Mutex<Vec<FetchCall>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` bars for `day` under a provider symbol.
    pub fn with_day(mut self, provider_symbol: &str, day: NaiveDate, count: usize) -> Self {
        self.bars
            .entry(provider_symbol.to_string())
            .or_default()
            .extend(session_bars(day, count));
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Day of each fetch, in call order.
    pub fn fetched_days(&self) -> Vec<NaiveDate> {
        self.calls().iter().map(|call| call.start.date()).collect()
    }
}

#[async_trait]
impl BulkProvider for MockProvider {
    async fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDateTime,
        end: NaiveDateTime,
        adjust: AdjustType,
    ) -> DataResult<ProviderBatch> {
        self.calls.lock().unwrap().push(FetchCall {
            symbols: symbols.to_vec(),
            start,
            end,
            adjust,
        });

        let (lo, hi) = (encode_datetime(start), encode_datetime(end));
        let mut batch = ProviderBatch::new();
        let mut dates = BTreeSet::new();
        for symbol in symbols {
            let bars: Vec<Bar> = self
                .bars
                .get(symbol)
                .map(|bars| {
                    bars.iter()
                        .filter(|bar| bar.datetime >= lo && bar.datetime <= hi)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            dates.extend(bars.iter().filter_map(Bar::date));
            batch = batch.with_bars(symbol.clone(), bars);
        }
        batch.trading_dates = dates.into_iter().collect();
        Ok(batch)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Fallback that counts calls and answers with a fixed daily bar.
#[derive(Default)]
pub struct MockFallback {
    pub get_bar_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
}

impl MockFallback {
    pub fn calls(&self) -> usize {
        self.get_bar_calls.load(Ordering::SeqCst) + self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FallbackSource for MockFallback {
    async fn get_bar(
        &self,
        _instrument: &Instrument,
        dt: NaiveDateTime,
        _frequency: Frequency,
    ) -> DataResult<Option<Bar>> {
        self.get_bar_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Bar::new(dt).with_field("close", 42.0)))
    }

    async fn history_bars(
        &self,
        _instrument: &Instrument,
        bar_count: usize,
        _frequency: Frequency,
        dt: NaiveDateTime,
        _options: &HistoryOptions,
    ) -> DataResult<Vec<Bar>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Bar::new(dt).with_field("close", 42.0); bar_count])
    }

    fn name(&self) -> &str {
        "mock-daily"
    }
}
