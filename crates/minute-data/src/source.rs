//! Minute data source: point and trailing-window queries over the cache.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use minute_core::error::{DataError, DataResult};
use minute_core::traits::{FallbackSource, HistoryOptions};
use minute_core::types::{encode_datetime, Bar, Frequency, Instrument};
use std::sync::Arc;
use tracing::trace;

use crate::fill::FillEngine;
use crate::store::{BarStore, CacheStats};

/// Default earliest date reported by [`MinuteDataSource::available_data_range`].
pub fn default_data_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 5, 1).unwrap_or_default()
}

/// Data source serving one-minute bars from a cache and daily bars from a
/// fallback source.
pub struct MinuteDataSource {
    store: BarStore,
    engine: FillEngine,
    fallback: Arc<dyn FallbackSource>,
    data_start: NaiveDate,
}

impl MinuteDataSource {
    /// Create a data source with an empty cache.
    pub fn new(engine: FillEngine, fallback: Arc<dyn FallbackSource>) -> Self {
        Self {
            store: BarStore::new(),
            engine,
            fallback,
            data_start: default_data_start(),
        }
    }

    /// Set the initial per-symbol cache size bound.
    pub fn with_cache_size(mut self, size: usize) -> Self {
        self.store = BarStore::with_size_bound(size);
        self
    }

    /// Set the earliest date reported as available.
    pub fn with_data_start(mut self, data_start: NaiveDate) -> Self {
        self.data_start = data_start;
        self
    }

    /// Get the bar at exactly `dt`.
    ///
    /// Returns `Ok(None)` when no bar exists at that timestamp (market closed,
    /// outside the session, or missing data).
    pub async fn get_bar(
        &mut self,
        instrument: &Instrument,
        dt: NaiveDateTime,
        frequency: Frequency,
    ) -> DataResult<Option<Bar>> {
        match frequency {
            Frequency::Daily => self.fallback.get_bar(instrument, dt, frequency).await,
            Frequency::Minute1 => {
                let symbol = instrument.order_book_id.as_str();
                let fetched = self
                    .engine
                    .ensure_day(&mut self.store, instrument, dt.date())
                    .await?;
                // Look up before trimming: shrinking may drop `dt`'s day when
                // it is older than the rest of the cache.
                let bar = self.store.find(symbol, encode_datetime(dt));
                self.store.shrink_to_bound(symbol);
                self.store.record_query(fetched);
                trace!(symbol, %dt, found = bar.is_some(), "Minute bar lookup");
                Ok(bar)
            }
            other => Err(DataError::UnsupportedFrequency(other)),
        }
    }

    /// Get the last `bar_count` bars at or before `dt`, ascending.
    ///
    /// Returns fewer bars when the instrument's history is shorter.
    pub async fn history_bars(
        &mut self,
        instrument: &Instrument,
        bar_count: usize,
        frequency: Frequency,
        dt: NaiveDateTime,
        options: &HistoryOptions,
    ) -> DataResult<Vec<Bar>> {
        match frequency {
            Frequency::Daily => {
                self.fallback
                    .history_bars(instrument, bar_count, frequency, dt, options)
                    .await
            }
            Frequency::Minute1 => {
                let symbol = instrument.order_book_id.as_str();
                let fetched = self
                    .engine
                    .ensure_coverage(&mut self.store, instrument, dt, bar_count)
                    .await?;
                self.store.sort(symbol);
                self.store.record_query(fetched);

                let bars = self.store.bars(symbol);
                let end = encode_datetime(dt);
                let upto = bars.partition_point(|bar| bar.datetime <= end);
                let window = &bars[upto.saturating_sub(bar_count)..upto];
                trace!(symbol, %dt, bar_count, returned = window.len(), "Minute history");

                let result = match &options.fields {
                    Some(fields) => window.iter().map(|bar| bar.project(fields)).collect(),
                    None => window.to_vec(),
                };
                // The bound is at least `bar_count`, and the window is already copied out.
                self.store.shrink_to_bound(symbol);
                Ok(result)
            }
            other => Err(DataError::UnsupportedFrequency(other)),
        }
    }

    /// Earliest and latest date with data, as of today.
    pub fn available_data_range(&self, frequency: Frequency) -> DataResult<(NaiveDate, NaiveDate)> {
        self.available_data_range_at(frequency, Local::now().date_naive())
    }

    /// Earliest and latest date with data, as of `today`. The latest is
    /// always the day before `today`.
    pub fn available_data_range_at(
        &self,
        frequency: Frequency,
        today: NaiveDate,
    ) -> DataResult<(NaiveDate, NaiveDate)> {
        if !frequency.is_cached() && !frequency.is_delegated() {
            return Err(DataError::UnsupportedFrequency(frequency));
        }
        Ok((self.data_start, today - Duration::days(1)))
    }

    /// The full trading calendar.
    pub fn trading_calendar(&self) -> DataResult<Vec<NaiveDate>> {
        self.engine.calendar().trading_calendar()
    }

    /// The underlying cache.
    pub fn store(&self) -> &BarStore {
        &self.store
    }

    /// Cache counters.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarAdapter;
    use crate::testing::{at, date, weekday_calendar, MockFallback, MockProvider};
    use crate::translator::SymbolTranslator;
    use chrono::{Datelike, Weekday};

    const SYMBOL: &str = "000001.XSHE";
    const PROVIDER_SYMBOL: &str = "SZSE.000001";

    fn source(provider: Arc<MockProvider>, fallback: Arc<MockFallback>) -> MinuteDataSource {
        let calendar = weekday_calendar(date(2023, 12, 1), date(2024, 2, 29));
        let engine = FillEngine::new(
            provider,
            CalendarAdapter::new(Arc::new(calendar)),
            SymbolTranslator::default(),
        );
        MinuteDataSource::new(engine, fallback)
    }

    fn instrument() -> Instrument {
        Instrument::new(SYMBOL, date(2000, 1, 1))
    }

    #[tokio::test]
    async fn test_get_bar_exact_match() {
        let day = date(2024, 1, 15);
        let provider = Arc::new(MockProvider::new().with_day(PROVIDER_SYMBOL, day, 30));
        let mut source = source(provider.clone(), Arc::new(MockFallback::default()));

        let bar = source
            .get_bar(&instrument(), at(day, 9, 40), Frequency::Minute1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bar.datetime, 20240115094000);
        assert_eq!(bar.close(), Some(19.0));

        // Same day again: served from cache
        source
            .get_bar(&instrument(), at(day, 9, 41), Frequency::Minute1)
            .await
            .unwrap();
        assert_eq!(provider.call_count(), 1);
        assert_eq!(source.stats().hits, 1);
        assert_eq!(source.stats().misses, 1);
    }

    #[tokio::test]
    async fn test_get_bar_miss_is_not_found() {
        let day = date(2024, 1, 15);
        let provider = Arc::new(MockProvider::new().with_day(PROVIDER_SYMBOL, day, 30));
        let mut source = source(provider, Arc::new(MockFallback::default()));

        // Lunch break: the day is populated but there is no bar at 12:00.
        let bar = source
            .get_bar(&instrument(), at(day, 12, 0), Frequency::Minute1)
            .await
            .unwrap();
        assert!(bar.is_none());
        assert_eq!(source.store().len(SYMBOL), 30);
    }

    #[tokio::test]
    async fn test_get_bar_shrinks_cache() {
        let mut provider = MockProvider::new();
        for day in [date(2024, 1, 10), date(2024, 1, 11), date(2024, 1, 12)] {
            provider = provider.with_day(PROVIDER_SYMBOL, day, 240);
        }
        let mut source = source(Arc::new(provider), Arc::new(MockFallback::default()));

        for day in [date(2024, 1, 10), date(2024, 1, 11), date(2024, 1, 12)] {
            let bar = source
                .get_bar(&instrument(), at(day, 10, 0), Frequency::Minute1)
                .await
                .unwrap();
            assert!(bar.is_some());
        }

        // Bound is 480: the oldest day is evicted.
        assert_eq!(source.store().len(SYMBOL), 480);
        assert_eq!(
            source.store().covered_dates(SYMBOL),
            vec![date(2024, 1, 11), date(2024, 1, 12)]
        );
    }

    #[tokio::test]
    async fn test_history_bars_trailing_window() {
        let day = date(2024, 1, 15);
        let provider = Arc::new(MockProvider::new().with_day(PROVIDER_SYMBOL, day, 100));
        let mut source = source(provider, Arc::new(MockFallback::default()));
        let dt = at(day, 10, 0); // 30th bar

        let bars = source
            .history_bars(&instrument(), 5, Frequency::Minute1, dt, &HistoryOptions::default())
            .await
            .unwrap();

        let stamps: Vec<i64> = bars.iter().map(|b| b.datetime).collect();
        assert_eq!(
            stamps,
            vec![
                20240115095600,
                20240115095700,
                20240115095800,
                20240115095900,
                20240115100000
            ]
        );
    }

    #[tokio::test]
    async fn test_history_bars_shorter_history() {
        let listed = date(2024, 1, 12);
        let provider = Arc::new(
            MockProvider::new()
                .with_day(PROVIDER_SYMBOL, date(2024, 1, 12), 10)
                .with_day(PROVIDER_SYMBOL, date(2024, 1, 15), 10),
        );
        let mut source = source(provider.clone(), Arc::new(MockFallback::default()));
        let inst = Instrument::new(SYMBOL, listed);

        let bars = source
            .history_bars(
                &inst,
                100,
                Frequency::Minute1,
                at(date(2024, 1, 15), 15, 0),
                &HistoryOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(bars.len(), 20);
        assert!(bars.windows(2).all(|w| w[0].datetime < w[1].datetime));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_history_bars_stops_at_calendar_start() {
        let provider = Arc::new(
            MockProvider::new()
                .with_day(PROVIDER_SYMBOL, date(2023, 12, 1), 5)
                .with_day(PROVIDER_SYMBOL, date(2023, 12, 4), 5),
        );
        let mut source = source(provider, Arc::new(MockFallback::default()));
        let dt = at(date(2023, 12, 4), 15, 0);

        // Listed long before the calendar begins: the walk runs out of
        // calendar and returns what it gathered.
        let bars = source
            .history_bars(&instrument(), 1000, Frequency::Minute1, dt, &HistoryOptions::default())
            .await
            .unwrap();

        assert_eq!(bars.len(), 10);
        assert_eq!(bars.first().unwrap().datetime, 20231201093100);
    }

    #[tokio::test]
    async fn test_history_queries_keep_cache_bounded() {
        let days: Vec<NaiveDate> = date(2024, 1, 2)
            .iter_days()
            .take_while(|d| *d <= date(2024, 2, 29))
            .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .collect();
        let mut provider = MockProvider::new();
        for day in &days {
            provider = provider.with_day(PROVIDER_SYMBOL, *day, 240);
        }
        let provider = Arc::new(provider);
        let mut source = source(provider.clone(), Arc::new(MockFallback::default()));
        let inst = Instrument::new(SYMBOL, days[0]);

        for day in &days {
            let bars = source
                .history_bars(
                    &inst,
                    10,
                    Frequency::Minute1,
                    at(*day, 14, 0),
                    &HistoryOptions::default(),
                )
                .await
                .unwrap();

            assert_eq!(bars.len(), 10);
            assert_eq!(bars.last().unwrap().datetime, encode_datetime(at(*day, 13, 30)));
            assert!(source.store().len(SYMBOL) <= source.store().size_bound().max(240));
            assert!(source.store().covered_dates(SYMBOL).len() <= 2);
        }

        assert_eq!(source.store().size_bound(), 480);
        assert_eq!(provider.call_count(), days.len());
        assert!(source.stats().dates_evicted >= days.len() as u64 - 2);
    }

    #[tokio::test]
    async fn test_history_bars_excludes_later_bars() {
        let day = date(2024, 1, 15);
        let provider = Arc::new(MockProvider::new().with_day(PROVIDER_SYMBOL, day, 100));
        let mut source = source(provider, Arc::new(MockFallback::default()));
        let inst = Instrument::new(SYMBOL, day);

        // Populate the whole day first through a point query.
        source
            .get_bar(&inst, at(day, 11, 0), Frequency::Minute1)
            .await
            .unwrap();
        let bars = source
            .history_bars(&inst, 10, Frequency::Minute1, at(day, 9, 35), &HistoryOptions::default())
            .await
            .unwrap();

        assert_eq!(bars.len(), 5);
        assert_eq!(bars.last().unwrap().datetime, 20240115093500);
    }

    #[tokio::test]
    async fn test_history_bars_field_projection() {
        let day = date(2024, 1, 15);
        let provider = Arc::new(MockProvider::new().with_day(PROVIDER_SYMBOL, day, 10));
        let mut source = source(provider, Arc::new(MockFallback::default()));
        let options = HistoryOptions {
            fields: Some(vec!["close".to_string()]),
            ..HistoryOptions::default()
        };

        let bars = source
            .history_bars(&instrument(), 3, Frequency::Minute1, at(day, 15, 0), &options)
            .await
            .unwrap();

        assert_eq!(bars.len(), 3);
        assert!(bars.iter().all(|b| b.fields.len() == 1 && b.close().is_some()));
    }

    #[tokio::test]
    async fn test_cache_size_only_grows() {
        let day = date(2024, 1, 15);
        let provider = Arc::new(MockProvider::new().with_day(PROVIDER_SYMBOL, day, 100));
        let mut source = source(provider, Arc::new(MockFallback::default()));
        let dt = at(day, 15, 0);
        let inst = Instrument::new(SYMBOL, day);

        source
            .history_bars(&inst, 500, Frequency::Minute1, dt, &HistoryOptions::default())
            .await
            .unwrap();
        source
            .history_bars(&inst, 100, Frequency::Minute1, dt, &HistoryOptions::default())
            .await
            .unwrap();

        assert!(source.store().size_bound() >= 500);
    }

    #[tokio::test]
    async fn test_daily_passthrough_skips_cache() {
        let provider = Arc::new(MockProvider::new());
        let fallback = Arc::new(MockFallback::default());
        let mut source = source(provider.clone(), fallback.clone());
        let dt = at(date(2024, 1, 15), 15, 0);

        let bar = source.get_bar(&instrument(), dt, Frequency::Daily).await.unwrap();
        let bars = source
            .history_bars(&instrument(), 3, Frequency::Daily, dt, &HistoryOptions::default())
            .await
            .unwrap();

        assert_eq!(bar.and_then(|b| b.close()), Some(42.0));
        assert_eq!(bars.len(), 3);
        assert_eq!(fallback.calls(), 2);
        assert_eq!(provider.call_count(), 0);
        assert!(!source.store().contains(SYMBOL));
        assert_eq!(source.store().size_bound(), 480);
        assert_eq!(source.stats(), CacheStats::default());
    }

    #[tokio::test]
    async fn test_unsupported_frequency_fails_fast() {
        let provider = Arc::new(MockProvider::new());
        let mut source = source(provider.clone(), Arc::new(MockFallback::default()));
        let dt = at(date(2024, 1, 15), 10, 0);

        let result = source.get_bar(&instrument(), dt, Frequency::Minute5).await;
        assert!(matches!(
            result,
            Err(DataError::UnsupportedFrequency(Frequency::Minute5))
        ));

        let result = source
            .history_bars(&instrument(), 10, Frequency::Tick, dt, &HistoryOptions::default())
            .await;
        assert!(matches!(result, Err(DataError::UnsupportedFrequency(Frequency::Tick))));
        assert_eq!(provider.call_count(), 0);
    }

    #[test]
    fn test_available_data_range() {
        let source = source(Arc::new(MockProvider::new()), Arc::new(MockFallback::default()));

        let (start, end) = source
            .available_data_range_at(Frequency::Minute1, date(2024, 3, 1))
            .unwrap();
        assert_eq!(start, date(2017, 5, 1));
        assert_eq!(end, date(2024, 2, 29));
        assert!(source.available_data_range_at(Frequency::Weekly, date(2024, 3, 1)).is_err());
    }
}
