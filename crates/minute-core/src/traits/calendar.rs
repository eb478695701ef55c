//! Trading calendar service trait.

use crate::error::DataResult;
use chrono::NaiveDate;

/// Source of trading dates.
pub trait CalendarService: Send + Sync {
    /// The trading date `offset` trading dates before `date`.
    ///
    /// `date` itself need not be a trading date; offset 1 is the last trading
    /// date strictly before it.
    fn previous_trading_date(&self, date: NaiveDate, offset: usize) -> DataResult<NaiveDate>;

    /// The full calendar, ascending.
    fn trading_calendar(&self) -> DataResult<Vec<NaiveDate>>;

    /// The earliest trading date the service knows, `None` when empty.
    fn first_trading_date(&self) -> DataResult<Option<NaiveDate>> {
        Ok(self.trading_calendar()?.first().copied())
    }
}
