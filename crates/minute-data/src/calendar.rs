//! Trading calendar: an in-memory calendar service and the adapter the fill
//! engine steps through.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use minute_core::error::{DataError, DataResult};
use minute_core::traits::CalendarService;
use std::path::Path;
use std::sync::Arc;

/// Sorted list of trading dates.
#[derive(Debug, Clone, Default)]
pub struct TradingCalendar {
    dates: Vec<NaiveDate>,
}

impl TradingCalendar {
    /// Create a calendar from trading dates in any order.
    pub fn new(mut dates: Vec<NaiveDate>) -> Self {
        dates.sort_unstable();
        dates.dedup();
        Self { dates }
    }

    /// Load a calendar from a file with one `YYYY-MM-DD` date per row.
    ///
    /// The first row may be a header.
    pub fn from_csv(path: &Path) -> DataResult<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| DataError::Calendar(format!("{}: {}", path.display(), e)))?;

        let mut dates = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let Some(cell) = record.get(0).map(str::trim).filter(|c| !c.is_empty()) else {
                continue;
            };
            match NaiveDate::parse_from_str(cell, "%Y-%m-%d") {
                Ok(date) => dates.push(date),
                Err(_) if row == 0 => continue,
                Err(e) => {
                    return Err(DataError::ParseError(format!(
                        "calendar row {}: {}: {}",
                        row + 1,
                        cell,
                        e
                    )))
                }
            }
        }

        Ok(Self::new(dates))
    }

    /// Number of trading dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the calendar is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Check if `date` is a trading date.
    pub fn is_trading_date(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    /// First and last trading date.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }
}

impl CalendarService for TradingCalendar {
    fn previous_trading_date(&self, date: NaiveDate, offset: usize) -> DataResult<NaiveDate> {
        // Index of the first trading date >= `date`.
        let pos = self.dates.partition_point(|d| *d < date);
        pos.checked_sub(offset)
            .and_then(|idx| self.dates.get(idx))
            .copied()
            .ok_or_else(|| {
                DataError::Calendar(format!(
                    "no trading date {} before {} in calendar",
                    offset, date
                ))
            })
    }

    fn trading_calendar(&self) -> DataResult<Vec<NaiveDate>> {
        Ok(self.dates.clone())
    }

    fn first_trading_date(&self) -> DataResult<Option<NaiveDate>> {
        Ok(self.dates.first().copied())
    }
}

/// Calendar view used by the fill engine.
#[derive(Clone)]
pub struct CalendarAdapter {
    service: Arc<dyn CalendarService>,
}

impl CalendarAdapter {
    /// Wrap a calendar service.
    pub fn new(service: Arc<dyn CalendarService>) -> Self {
        Self { service }
    }

    /// The last trading date strictly before `date`.
    ///
    /// Fails if the service answers with a date that is not earlier, so a
    /// backward walk can never stall.
    pub fn previous_trading_date(&self, date: NaiveDate) -> DataResult<NaiveDate> {
        let previous = self.service.previous_trading_date(date, 1)?;
        if previous >= date {
            return Err(DataError::Calendar(format!(
                "previous trading date of {} is {}",
                date, previous
            )));
        }
        Ok(previous)
    }

    /// Like [`previous_trading_date`](Self::previous_trading_date), but
    /// `None` when `date` is at or before the start of the calendar.
    pub fn earlier_trading_date(&self, date: NaiveDate) -> DataResult<Option<NaiveDate>> {
        match self.service.first_trading_date()? {
            Some(first) if first < date => self.previous_trading_date(date).map(Some),
            _ => Ok(None),
        }
    }

    /// The full calendar.
    pub fn trading_calendar(&self) -> DataResult<Vec<NaiveDate>> {
        self.service.trading_calendar()
    }
}
