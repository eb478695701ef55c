//! Traits for the collaborators the cache depends on.

mod calendar;
mod fallback;
mod provider;

pub use calendar::CalendarService;
pub use fallback::{FallbackSource, HistoryOptions};
pub use provider::{BulkProvider, ProviderBatch};
