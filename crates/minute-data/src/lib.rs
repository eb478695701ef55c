//! Minute bar cache and data sources.
//!
//! [`MinuteDataSource`] answers point and trailing-window queries for
//! one-minute bars from a per-symbol cache ([`BarStore`]). Misses are filled
//! by [`FillEngine`], which requests whole trading sessions from a
//! [`BulkProvider`](minute_core::BulkProvider) and walks backward through the
//! trading calendar until enough bars are buffered. Daily queries go to a
//! [`FallbackSource`](minute_core::FallbackSource) unchanged.

mod calendar;
mod csv_source;
mod fill;
mod source;
mod store;
mod translator;

#[cfg(test)]
mod testing;

pub use calendar::{CalendarAdapter, TradingCalendar};
pub use csv_source::{CsvBulkProvider, CsvDailySource};
pub use fill::FillEngine;
pub use source::{default_data_start, MinuteDataSource};
pub use store::{BarStore, CacheStats, DEFAULT_CACHE_SIZE};
pub use translator::SymbolTranslator;
