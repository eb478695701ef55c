//! Data source identifier to provider identifier mapping.

use minute_core::error::{DataError, DataResult};

/// Length of the exchange code kept from the base identifier.
const CODE_LEN: usize = 6;

/// Maps `000001.XSHE` style identifiers to `SZSE.000001` style ones.
#[derive(Debug, Clone)]
pub struct SymbolTranslator {
    /// (suffix, prefix) pairs
    exchanges: Vec<(String, String)>,
}

impl SymbolTranslator {
    /// Create a translator from (suffix, prefix) pairs.
    pub fn new<I, S, P>(exchanges: I) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<String>,
    {
        let mut exchanges: Vec<(String, String)> = exchanges
            .into_iter()
            .map(|(s, p)| (s.into(), p.into()))
            .collect();
        // Longest suffix wins when suffixes overlap.
        exchanges.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { exchanges }
    }

    /// Translate a data source identifier.
    pub fn translate(&self, order_book_id: &str) -> DataResult<String> {
        let (suffix, prefix) = self
            .exchanges
            .iter()
            .find(|(suffix, _)| order_book_id.ends_with(suffix.as_str()))
            .ok_or_else(|| DataError::UnknownExchange(order_book_id.to_string()))?;

        let base = &order_book_id[..order_book_id.len() - suffix.len()];
        let code: String = base.chars().take(CODE_LEN).collect();
        if code.is_empty() {
            return Err(DataError::InvalidSymbol(order_book_id.to_string()));
        }

        Ok(format!("{}{}", prefix, code))
    }
}

impl Default for SymbolTranslator {
    fn default() -> Self {
        Self::new([(".XSHE", "SZSE."), (".XSHG", "SHSE.")])
    }
}
