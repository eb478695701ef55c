//! Integer datetime encoding.
//!
//! Bars carry their timestamp as the decimal integer `YYYYMMDDHHMMSS`, so
//! `2024-01-15 09:31:00` becomes `20240115093100`. Integer order matches
//! datetime order, which is all the cache relies on.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATE_SCALE: i64 = 1_000_000;

/// Encode a datetime as `YYYYMMDDHHMMSS`.
pub fn encode_datetime(dt: NaiveDateTime) -> i64 {
    date_to_int(dt.date()) * DATE_SCALE
        + dt.hour() as i64 * 10_000
        + dt.minute() as i64 * 100
        + dt.second() as i64
}

/// Decode a `YYYYMMDDHHMMSS` integer. Returns `None` for out-of-range parts.
pub fn decode_datetime(value: i64) -> Option<NaiveDateTime> {
    let date_part = value.div_euclid(DATE_SCALE);
    let time_part = value.rem_euclid(DATE_SCALE);

    let year = i32::try_from(date_part / 10_000).ok()?;
    let month = ((date_part / 100) % 100) as u32;
    let day = (date_part % 100) as u32;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let hour = (time_part / 10_000) as u32;
    let minute = ((time_part / 100) % 100) as u32;
    let second = (time_part % 100) as u32;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;

    Some(date.and_time(time))
}

/// Encode a date as `YYYYMMDD`.
pub fn date_to_int(date: NaiveDate) -> i64 {
    date.year() as i64 * 10_000 + date.month() as i64 * 100 + date.day() as i64
}

/// Midnight at the start of `date`.
#[inline]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}
