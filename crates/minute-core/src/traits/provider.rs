//! Bulk data provider trait.

use crate::error::{DataError, DataResult};
use crate::types::{AdjustType, Bar};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

/// Result of one bulk fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderBatch {
    /// Bars per provider symbol. A symbol with no data maps to an empty vector
    /// or is absent.
    pub bars: HashMap<String, Vec<Bar>>,
    /// Trading dates the provider reports as covered by this fetch
    pub trading_dates: Vec<NaiveDate>,
}

impl ProviderBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add bars for a provider symbol.
    pub fn with_bars(mut self, symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        self.bars.entry(symbol.into()).or_default().extend(bars);
        self
    }

    /// Add covered trading dates given as `YYYY-MM-DD` strings.
    pub fn with_date_strings<S: AsRef<str>>(mut self, dates: &[S]) -> DataResult<Self> {
        for date in dates {
            let parsed = NaiveDate::parse_from_str(date.as_ref(), "%Y-%m-%d")
                .map_err(|e| DataError::ParseError(format!("{}: {}", date.as_ref(), e)))?;
            self.trading_dates.push(parsed);
        }
        Ok(self)
    }

    /// Take the bars for one symbol, empty if the provider returned none.
    pub fn take_bars(&mut self, symbol: &str) -> Vec<Bar> {
        self.bars.remove(symbol).unwrap_or_default()
    }
}

/// Trait for the expensive bulk data source behind the cache.
///
/// Implementations are most efficient over whole trading sessions; the cache
/// only ever asks for one session at a time.
#[async_trait]
pub trait BulkProvider: Send + Sync {
    /// Fetch minute bars.
    ///
    /// # Arguments
    /// * `symbols` - Provider symbols (already translated)
    /// * `start` - Start of the closed range
    /// * `end` - End of the closed range
    /// * `adjust` - Price adjustment mode
    ///
    /// # Returns
    /// Bars per symbol plus the trading dates actually covered
    async fn fetch(
        &self,
        symbols: &[String],
        start: NaiveDateTime,
        end: NaiveDateTime,
        adjust: AdjustType,
    ) -> DataResult<ProviderBatch>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_date_strings() {
        let batch = ProviderBatch::new()
            .with_date_strings(&["2024-01-15", "2024-01-16"])
            .unwrap();
        assert_eq!(batch.trading_dates.len(), 2);
        assert_eq!(batch.trading_dates[0], NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());

        let bad = ProviderBatch::new().with_date_strings(&["20240115"]);
        assert!(matches!(bad, Err(DataError::ParseError(_))));
    }

    #[test]
    fn test_take_missing_symbol() {
        let mut batch = ProviderBatch::new().with_bars("SZSE.000001", Vec::new());
        assert!(batch.take_bars("SHSE.600000").is_empty());
        assert!(batch.take_bars("SZSE.000001").is_empty());
    }
}
