//! Per-symbol minute bar cache.

use chrono::{NaiveDate, NaiveDateTime};
use minute_core::types::{encode_datetime, start_of_day, Bar};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Default lower bound on the number of bars kept per symbol.
pub const DEFAULT_CACHE_SIZE: usize = 480;

/// Cached bars and covered trading dates for one symbol.
#[derive(Debug, Default)]
struct SymbolCache {
    /// Not sorted between mutations
    bars: Vec<Bar>,
    /// Dates a fetch was made for, including days that returned nothing
    covered: BTreeSet<NaiveDate>,
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Minute queries answered without a provider fetch
    pub hits: u64,
    /// Minute queries that needed at least one provider fetch
    pub misses: u64,
    /// Provider fetches made to fill the cache
    pub fetches: u64,
    /// Bars merged into the cache
    pub bars_merged: u64,
    /// Covered dates dropped by shrinking
    pub dates_evicted: u64,
}

impl CacheStats {
    /// Hit rate in [0, 1].
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Bar cache keyed by symbol.
#[derive(Debug)]
pub struct BarStore {
    entries: HashMap<String, SymbolCache>,
    size_bound: usize,
    stats: CacheStats,
}

impl BarStore {
    /// Create a store with the default size bound.
    pub fn new() -> Self {
        Self::with_size_bound(DEFAULT_CACHE_SIZE)
    }

    /// Create a store with the given initial size bound.
    pub fn with_size_bound(size_bound: usize) -> Self {
        Self {
            entries: HashMap::new(),
            size_bound,
            stats: CacheStats::default(),
        }
    }

    /// Current per-symbol size bound.
    pub fn size_bound(&self) -> usize {
        self.size_bound
    }

    /// Raise the size bound to at least `bar_count`. Never lowers it.
    pub fn raise_bound(&mut self, bar_count: usize) {
        if bar_count > self.size_bound {
            debug!(from = self.size_bound, to = bar_count, "Raising cache size bound");
            self.size_bound = bar_count;
        }
    }

    /// Bars with timestamp in the closed interval `[start, end]`.
    pub fn get_range(&self, symbol: &str, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Bar> {
        let (start, end) = (encode_datetime(start), encode_datetime(end));
        self.entries
            .get(symbol)
            .map(|entry| {
                entry
                    .bars
                    .iter()
                    .filter(|bar| bar.datetime >= start && bar.datetime <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of bars with encoded timestamp in `[start, end]`.
    pub fn count_range(&self, symbol: &str, start: i64, end: i64) -> usize {
        self.entries.get(symbol).map_or(0, |entry| {
            entry
                .bars
                .iter()
                .filter(|bar| bar.datetime >= start && bar.datetime <= end)
                .count()
        })
    }

    /// The bar with exactly this encoded timestamp.
    pub fn find(&self, symbol: &str, datetime: i64) -> Option<Bar> {
        self.entries
            .get(symbol)?
            .bars
            .iter()
            .find(|bar| bar.datetime == datetime)
            .cloned()
    }

    /// All bars for a symbol in their current order.
    pub fn bars(&self, symbol: &str) -> &[Bar] {
        self.entries
            .get(symbol)
            .map(|entry| entry.bars.as_slice())
            .unwrap_or(&[])
    }

    /// Append bars and record covered dates. Does not sort or dedup.
    pub fn merge(
        &mut self,
        symbol: &str,
        bars: Vec<Bar>,
        covered_dates: impl IntoIterator<Item = NaiveDate>,
    ) {
        let entry = self.entries.entry(symbol.to_string()).or_default();
        self.stats.bars_merged += bars.len() as u64;
        entry.bars.extend(bars);
        entry.covered.extend(covered_dates);
    }

    /// Sort bars by timestamp and drop duplicate timestamps, keeping the
    /// first merged row.
    pub fn sort(&mut self, symbol: &str) {
        if let Some(entry) = self.entries.get_mut(symbol) {
            entry.bars.sort_by_key(|bar| bar.datetime);
            entry.bars.dedup_by_key(|bar| bar.datetime);
        }
    }

    /// Drop whole covered days, oldest first, while more than `size_bound`
    /// bars and more than one covered date remain.
    ///
    /// Returns the number of dates dropped.
    pub fn shrink(&mut self, symbol: &str, size_bound: usize) -> usize {
        self.sort(symbol);
        let Some(entry) = self.entries.get_mut(symbol) else {
            return 0;
        };

        let mut dropped = 0;
        while entry.bars.len() > size_bound && entry.covered.len() > 1 {
            let Some(earliest) = entry.covered.pop_first() else {
                break;
            };
            let Some(&next) = entry.covered.first() else {
                break;
            };
            // Everything before the next covered day goes with the earliest one.
            let cutoff = encode_datetime(start_of_day(next));
            let keep_from = entry.bars.partition_point(|bar| bar.datetime < cutoff);
            entry.bars.drain(..keep_from);
            dropped += 1;
            debug!(symbol, %earliest, bars_dropped = keep_from, "Evicted covered date");
        }

        self.stats.dates_evicted += dropped as u64;
        dropped
    }

    /// Shrink using the store's own size bound.
    pub fn shrink_to_bound(&mut self, symbol: &str) -> usize {
        self.shrink(symbol, self.size_bound)
    }

    /// Whether a fetch was already made for `day`.
    pub fn is_covered(&self, symbol: &str, day: NaiveDate) -> bool {
        self.entries
            .get(symbol)
            .is_some_and(|entry| entry.covered.contains(&day))
    }

    /// Covered dates, ascending.
    pub fn covered_dates(&self, symbol: &str) -> Vec<NaiveDate> {
        self.entries
            .get(symbol)
            .map(|entry| entry.covered.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of cached bars for a symbol.
    pub fn len(&self, symbol: &str) -> usize {
        self.entries.get(symbol).map_or(0, |entry| entry.bars.len())
    }

    /// Whether a cache entry exists for the symbol.
    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    /// Symbols with a cache entry.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Record one provider fetch.
    pub fn record_fetch(&mut self) {
        self.stats.fetches += 1;
    }

    /// Record the outcome of a minute query.
    pub fn record_query(&mut self, fetched: bool) {
        if fetched {
            self.stats.misses += 1;
        } else {
            self.stats.hits += 1;
        }
    }

    /// Cache counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl Default for BarStore {
    fn default() -> Self {
        Self::new()
    }
}
