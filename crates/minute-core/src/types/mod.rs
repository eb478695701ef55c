//! Core data types for the minute bar cache.

mod bar;
mod datetime;
mod frequency;
mod instrument;
mod session;

pub use bar::{Bar, BarFields};
pub use datetime::{date_to_int, decode_datetime, encode_datetime, start_of_day};
pub use frequency::Frequency;
pub use instrument::{AdjustType, Instrument};
pub use session::{SessionSchedule, DEFAULT_OPEN_CUTOFF, DEFAULT_SESSION_END, DEFAULT_SESSION_START};
