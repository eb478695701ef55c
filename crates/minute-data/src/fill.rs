//! Day-granularity fill of the bar cache from the bulk provider.

use chrono::{NaiveDate, NaiveDateTime};
use minute_core::error::DataResult;
use minute_core::traits::BulkProvider;
use minute_core::types::{encode_datetime, start_of_day, AdjustType, Instrument, SessionSchedule};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::calendar::CalendarAdapter;
use crate::store::BarStore;
use crate::translator::SymbolTranslator;

/// Decides which trading sessions to request and merges them into a store.
pub struct FillEngine {
    provider: Arc<dyn BulkProvider>,
    calendar: CalendarAdapter,
    translator: SymbolTranslator,
    session: SessionSchedule,
    adjust_type: AdjustType,
}

impl FillEngine {
    /// Create a fill engine with the default session and pre-adjusted prices.
    pub fn new(
        provider: Arc<dyn BulkProvider>,
        calendar: CalendarAdapter,
        translator: SymbolTranslator,
    ) -> Self {
        Self {
            provider,
            calendar,
            translator,
            session: SessionSchedule::default(),
            adjust_type: AdjustType::default(),
        }
    }

    /// Set the session schedule.
    pub fn with_session(mut self, session: SessionSchedule) -> Self {
        self.session = session;
        self
    }

    /// Set the adjustment mode passed to the provider.
    pub fn with_adjust_type(mut self, adjust_type: AdjustType) -> Self {
        self.adjust_type = adjust_type;
        self
    }

    /// Calendar used for backward stepping.
    pub fn calendar(&self) -> &CalendarAdapter {
        &self.calendar
    }

    /// Trading session a look-back starting at `reference_dt` belongs to.
    ///
    /// Before the open cutoff the current day has no bars yet, so the walk
    /// starts from the previous trading date. `None` when that date would lie
    /// before the start of the calendar.
    pub fn anchor_date(&self, reference_dt: NaiveDateTime) -> DataResult<Option<NaiveDate>> {
        let day = reference_dt.date();
        if self.session.is_pre_open(reference_dt) {
            self.calendar.earlier_trading_date(day)
        } else {
            Ok(Some(day))
        }
    }

    /// Walk backward over trading dates until at least `bar_count` bars lie in
    /// `[start of anchor date, reference_dt]`, or the listing date is passed.
    ///
    /// Raises the store's size bound to `bar_count` first. Returns whether any
    /// provider fetch was made. Running out of history, either at the listing
    /// date or at the start of the calendar, is not an error.
    pub async fn ensure_coverage(
        &self,
        store: &mut BarStore,
        instrument: &Instrument,
        reference_dt: NaiveDateTime,
        bar_count: usize,
    ) -> DataResult<bool> {
        store.raise_bound(bar_count);

        let symbol = instrument.order_book_id.as_str();
        let end = encode_datetime(reference_dt);
        let Some(mut anchor) = self.anchor_date(reference_dt)? else {
            debug!(symbol, %reference_dt, "No session before the start of the calendar");
            return Ok(false);
        };
        let mut fetched = false;

        loop {
            let cached = store.count_range(symbol, encode_datetime(start_of_day(anchor)), end);
            trace!(symbol, %anchor, cached, bar_count, "Coverage check");
            if cached >= bar_count {
                break;
            }
            if anchor < instrument.listed_date {
                debug!(symbol, listed_date = %instrument.listed_date, cached, "History exhausted");
                break;
            }
            if !store.is_covered(symbol, anchor) {
                self.fetch_session(store, instrument, anchor).await?;
                fetched = true;
            }
            // Every earlier trading date precedes the listing date.
            if anchor <= instrument.listed_date {
                debug!(symbol, listed_date = %instrument.listed_date, "Reached listing date");
                break;
            }
            match self.calendar.earlier_trading_date(anchor)? {
                Some(previous) => anchor = previous,
                None => {
                    debug!(symbol, %anchor, cached, "Reached start of calendar");
                    break;
                }
            }
        }

        Ok(fetched)
    }

    /// Make sure `day` has been fetched. Returns whether a fetch was made.
    pub async fn ensure_day(
        &self,
        store: &mut BarStore,
        instrument: &Instrument,
        day: NaiveDate,
    ) -> DataResult<bool> {
        if store.is_covered(&instrument.order_book_id, day) {
            return Ok(false);
        }
        self.fetch_session(store, instrument, day).await?;
        Ok(true)
    }

    /// Fetch one trading session and merge it.
    ///
    /// The requested day is recorded as covered together with whatever dates
    /// the provider reports, so an empty day is never requested again.
    async fn fetch_session(
        &self,
        store: &mut BarStore,
        instrument: &Instrument,
        day: NaiveDate,
    ) -> DataResult<()> {
        let provider_symbol = self.translator.translate(&instrument.order_book_id)?;
        let (start, end) = self.session.window(day);

        let mut batch = self
            .provider
            .fetch(std::slice::from_ref(&provider_symbol), start, end, self.adjust_type)
            .await?;
        store.record_fetch();
        let bars = batch.take_bars(&provider_symbol);

        debug!(
            symbol = %instrument.order_book_id,
            provider_symbol = %provider_symbol,
            %day,
            bars = bars.len(),
            reported_dates = batch.trading_dates.len(),
            "Fetched session from {}",
            self.provider.name()
        );

        let mut covered = batch.trading_dates;
        covered.push(day);
        store.merge(&instrument.order_book_id, bars, covered);
        Ok(())
    }
}
