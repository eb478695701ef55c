//! Fallback source for queries the minute cache does not serve.

use crate::error::DataResult;
use crate::types::{AdjustType, Bar, Frequency, Instrument};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Optional arguments of a history query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryOptions {
    /// Fields to keep; `None` keeps every provider field
    pub fields: Option<Vec<String>>,
    /// Skip suspended days (fallback only)
    pub skip_suspended: bool,
    /// Include the bar still forming at `dt` (fallback only)
    pub include_now: bool,
    /// Price adjustment mode
    pub adjust_type: AdjustType,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            fields: None,
            skip_suspended: true,
            include_now: false,
            adjust_type: AdjustType::Pre,
        }
    }
}

/// Generic data source that daily queries are forwarded to unchanged.
#[async_trait]
pub trait FallbackSource: Send + Sync {
    /// Get the bar at `dt`.
    async fn get_bar(
        &self,
        instrument: &Instrument,
        dt: NaiveDateTime,
        frequency: Frequency,
    ) -> DataResult<Option<Bar>>;

    /// Get the last `bar_count` bars ending at or before `dt`, ascending.
    async fn history_bars(
        &self,
        instrument: &Instrument,
        bar_count: usize,
        frequency: Frequency,
        dt: NaiveDateTime,
        options: &HistoryOptions,
    ) -> DataResult<Vec<Bar>>;

    /// Get the source name.
    fn name(&self) -> &str;
}
