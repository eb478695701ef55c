//! Trading session window used for day fetches.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Queries strictly before this time of day belong to the previous session
/// when looking back N bars (market open plus one minute).
pub const DEFAULT_OPEN_CUTOFF: (u32, u32) = (9, 31);
/// Start of the fetch window for one trading date.
pub const DEFAULT_SESSION_START: (u32, u32) = (9, 0);
/// End of the fetch window for one trading date.
pub const DEFAULT_SESSION_END: (u32, u32) = (18, 0);

fn hm((hour, minute): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Session boundaries for one trading date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSchedule {
    /// Times of day before this map to the previous trading date
    pub open_cutoff: NaiveTime,
    /// First instant requested from the provider for a day
    pub start: NaiveTime,
    /// Last instant requested from the provider for a day
    pub end: NaiveTime,
}

impl SessionSchedule {
    /// Whether `dt` falls before the open cutoff of its own day.
    #[inline]
    pub fn is_pre_open(&self, dt: NaiveDateTime) -> bool {
        dt.time() < self.open_cutoff
    }

    /// Closed fetch window `[day start, day end]`.
    pub fn window(&self, day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (day.and_time(self.start), day.and_time(self.end))
    }
}

impl Default for SessionSchedule {
    fn default() -> Self {
        Self {
            open_cutoff: hm(DEFAULT_OPEN_CUTOFF),
            start: hm(DEFAULT_SESSION_START),
            end: hm(DEFAULT_SESSION_END),
        }
    }
}
